use thiserror::Error;

use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::evaluation::EvaluationError;
use crate::manifest::ManifestError;
use crate::rating::RatingError;
use crate::scoring::ScoringError;
use crate::storage::StorageError;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Scoring(#[from] ScoringError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Evaluation(#[from] EvaluationError),

    #[error(transparent)]
    Rating(#[from] RatingError),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
