use std::io;
use std::path::PathBuf;

use common::UnknownSource;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenError {
    #[error("invalid configuration:\n  {}", .0.join("\n  "))]
    InvalidConfig(Vec<String>),

    #[error(transparent)]
    UnknownSource(#[from] UnknownSource),

    #[error("invalid day `{0}`, expected YYYY-MM-DD")]
    InvalidDay(String),

    #[error("invalid weight table: {0}")]
    Weights(#[from] rand::distr::weighted::Error),

    #[error("IO error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("generation task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("worker pool closed: {0}")]
    PoolClosed(#[from] tokio::sync::AcquireError),

    #[error("{} malformed record(s) found", .0)]
    MalformedRecords(usize),
}

impl GenError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        GenError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, GenError>;

/// Attaches the offending path to an `io::Result`.
pub trait IoContext<T> {
    fn at(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoContext<T> for io::Result<T> {
    fn at(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|source| GenError::io(path, source))
    }
}
