use thiserror::Error;

#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("version range {range} is empty (min > max)")]
    UnsatisfiableRange { range: String },

    #[error("no stack with patches falls in version range {range}")]
    NoOrigins { range: String },
}

pub type EvaluationResult<T> = Result<T, EvaluationError>;
