use std::path::{Path, PathBuf};

use crate::error::{IoContext, Result};
use crate::storage::paths::{self, PartitionPaths};
use crate::storage::{PartLines, PartitionRef, Storage, WrittenPart};

use chrono::NaiveDate;
use common::{EventRecord, Source};
use tokio::{
    fs::{File, create_dir_all, read_dir, remove_file, rename},
    io::{AsyncWriteExt, BufReader, BufWriter},
};

pub struct FilesystemStorage {
    path_manager: PartitionPaths,
}

impl FilesystemStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FilesystemStorage {
            path_manager: PartitionPaths::new(root),
        }
    }

    /// Names of the visible entries of `dir` that are directories (or files,
    /// when `dirs` is false), sorted.
    async fn entries(&self, dir: &Path, dirs: bool) -> Result<Vec<(String, PathBuf)>> {
        let mut entries = vec![];
        let mut read_dir = read_dir(dir).await.at(dir)?;
        while let Some(entry) = read_dir.next_entry().await.at(dir)? {
            let path = entry.path();
            let file_type = entry.file_type().await.at(&path)?;
            if file_type.is_dir() != dirs {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                tracing::warn!("skipping non UTF-8 entry {}", path.display());
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            entries.push((name, path));
        }
        entries.sort();
        Ok(entries)
    }
}

#[async_trait::async_trait]
impl Storage for FilesystemStorage {
    fn paths(&self) -> &PartitionPaths {
        &self.path_manager
    }

    async fn create_root(&self) -> Result<()> {
        let root = self.path_manager.root();
        create_dir_all(root).await.at(root)
    }

    async fn create_partition(&self, day: NaiveDate, source: Source) -> Result<PathBuf> {
        let path = self.path_manager.partition_path(day, source);
        create_dir_all(&path).await.at(&path)?;
        Ok(path)
    }

    async fn write_part(
        &self,
        day: NaiveDate,
        source: Source,
        index: usize,
        records: &mut (dyn Iterator<Item = EventRecord> + Send),
    ) -> Result<WrittenPart> {
        let staging = self.path_manager.staging_path(day, source, index);
        let target = self.path_manager.part_path(day, source, index);

        let written = async {
            let file = File::create(&staging).await.at(&staging)?;
            let mut writer = BufWriter::new(file);
            let mut events = 0u64;
            for record in records {
                let mut line = serde_json::to_vec(&record)?;
                line.push(b'\n');
                writer.write_all(&line).await.at(&staging)?;
                events += 1;
            }
            writer.flush().await.at(&staging)?;
            writer.get_ref().sync_all().await.at(&staging)?;
            Ok::<_, crate::error::GenError>(events)
        }
        .await;

        let events = match written {
            Ok(events) => events,
            Err(err) => {
                // Leave no half-written staging file behind.
                let _ = remove_file(&staging).await;
                return Err(err);
            }
        };

        rename(&staging, &target).await.at(&target)?;
        Ok(WrittenPart {
            path: target,
            events,
        })
    }

    async fn list_partitions(&self) -> Result<Vec<PartitionRef>> {
        let mut partitions = vec![];
        for (day_name, day_path) in self.entries(self.path_manager.root(), true).await? {
            let Some(day) = paths::parse_day_dir(&day_name) else {
                tracing::warn!("skipping unrecognized directory {}", day_path.display());
                continue;
            };
            for (source_name, source_path) in self.entries(&day_path, true).await? {
                let Some(source) = paths::parse_source_dir(&source_name) else {
                    tracing::warn!("skipping unrecognized directory {}", source_path.display());
                    continue;
                };
                partitions.push(PartitionRef {
                    day,
                    source,
                    path: source_path,
                });
            }
        }
        partitions.sort();
        Ok(partitions)
    }

    async fn list_parts(&self, partition: &PartitionRef) -> Result<Vec<PathBuf>> {
        let mut parts = vec![];
        for (name, path) in self.entries(&partition.path, false).await? {
            match paths::parse_part_file(&name) {
                Some(index) => parts.push((index, path)),
                None => tracing::warn!("skipping unrecognized file {}", path.display()),
            }
        }
        parts.sort();
        Ok(parts.into_iter().map(|(_, path)| path).collect())
    }

    async fn open_part(&self, path: &Path) -> Result<PartLines> {
        let file = File::open(path).await.at(path)?;
        Ok(PartLines::new(path, BufReader::new(file)))
    }
}
