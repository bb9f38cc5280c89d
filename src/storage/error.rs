use std::path::PathBuf;

use thiserror::Error;

use crate::registry::RegistryError;
use crate::storage::mmap::MmapError;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A text store line that is not exactly two distinct valid ids.
    #[error("{}:{line}: malformed pair line: {reason}", .path.display())]
    Malformed {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("snapshot {} unusable: {reason}", .path.display())]
    Snapshot { path: PathBuf, reason: String },

    #[error("mmap error: {0}")]
    Mmap(#[from] MmapError),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("failed to create data directory {}", .path.display())]
    DataDirUnavailable { path: PathBuf },

    #[error("inconsistent decision stores: {0}")]
    Registry(#[from] RegistryError),
}

pub type StorageResult<T> = Result<T, StorageError>;
