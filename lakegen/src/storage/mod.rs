use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use common::{EventRecord, Source};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::error::{IoContext, Result};

pub mod driver;
pub mod paths;

pub use driver::filesystem::FilesystemStorage;
pub use paths::PartitionPaths;

/// A `(day, source)` directory found under the output root.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct PartitionRef {
    pub day: NaiveDate,
    pub source: Source,
    pub path: PathBuf,
}

/// A part file that has been written and moved into place.
#[derive(Clone, Debug)]
pub struct WrittenPart {
    pub path: PathBuf,
    pub events: u64,
}

/// Streams the lines of one part file as raw bytes, without the line
/// terminator. Bytes are not decoded, so a corrupt line does not end the read.
pub struct PartLines {
    path: PathBuf,
    reader: Box<dyn AsyncBufRead + Send + Unpin>,
    buf: Vec<u8>,
}

impl PartLines {
    pub fn new(
        path: impl Into<PathBuf>,
        reader: impl AsyncBufRead + Send + Unpin + 'static,
    ) -> Self {
        PartLines {
            path: path.into(),
            reader: Box::new(reader),
            buf: Vec::new(),
        }
    }

    /// The next line, or `None` at end of file. A final line without `\n`
    /// still counts.
    pub async fn next_line(&mut self) -> Result<Option<&[u8]>> {
        self.buf.clear();
        let read = self
            .reader
            .read_until(b'\n', &mut self.buf)
            .await
            .at(&self.path)?;
        if read == 0 {
            return Ok(None);
        }
        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
            if self.buf.last() == Some(&b'\r') {
                self.buf.pop();
            }
        }
        Ok(Some(self.buf.as_slice()))
    }
}

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    fn paths(&self) -> &PartitionPaths;
    async fn create_root(&self) -> Result<()>;
    async fn create_partition(&self, day: NaiveDate, source: Source) -> Result<PathBuf>;
    /// Writes `records` as JSONL to part file `index`, replacing any previous
    /// file of that name.
    async fn write_part(
        &self,
        day: NaiveDate,
        source: Source,
        index: usize,
        records: &mut (dyn Iterator<Item = EventRecord> + Send),
    ) -> Result<WrittenPart>;
    /// Recognized partitions, sorted by day then source.
    async fn list_partitions(&self) -> Result<Vec<PartitionRef>>;
    /// Part files of one partition, sorted by index.
    async fn list_parts(&self, partition: &PartitionRef) -> Result<Vec<PathBuf>>;
    async fn open_part(&self, path: &Path) -> Result<PartLines>;
}
