use std::path::PathBuf;

use thiserror::Error;

use crate::storage::StorageError;

#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid reply index {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{}:{line}: invalid upstream id: {reason}", .path.display())]
    MalformedUpstream {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("failed to encode records: {0}")]
    Encode(#[source] serde_json::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type AggregateResult<T> = Result<T, AggregateError>;
