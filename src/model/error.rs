use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("patch id is empty")]
    EmptyPatchId,

    #[error("patch id '{value}' contains whitespace")]
    WhitespaceInPatchId { value: String },

    #[error("a pair needs two distinct patch ids, got '{id}' twice")]
    SelfPair { id: String },

    #[error("invalid version '{value}': {reason}")]
    InvalidVersion { value: String, reason: String },
}

pub type ModelResult<T> = Result<T, ModelError>;
