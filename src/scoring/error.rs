use std::path::PathBuf;

use thiserror::Error;

use crate::model::ModelError;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("no score known for {origin} -> {candidate}")]
    MissingScore { origin: String, candidate: String },

    #[error("scoring computation failed: {reason}")]
    ComputationFailed { reason: String },

    #[error("invalid thresholds: {reason}")]
    InvalidThresholds { reason: String },

    #[error("malformed score table {}:{line}: {reason}", .path.display())]
    MalformedTable {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("invalid patch id: {0}")]
    Model(#[from] ModelError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ScoringResult<T> = Result<T, ScoringError>;
