use thiserror::Error;

use crate::registry::RegistryError;
use crate::storage::StorageError;

#[derive(Error, Debug)]
pub enum RatingError {
    #[error("rater I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("rater unavailable: {0}")]
    RaterUnavailable(String),

    #[error("checkpoint failed: {0}")]
    Checkpoint(#[from] StorageError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

pub type RatingResult<T> = Result<T, RatingError>;
