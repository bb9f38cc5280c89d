//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A threshold could not be parsed as a number.
    #[error("failed to parse {name} '{value}': {source}")]
    ThresholdParseError {
        name: &'static str,
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    /// An integer setting could not be parsed.
    #[error("failed to parse {name} '{value}': {source}")]
    IntegerParseError {
        name: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("invalid version bound {name}: {source}")]
    InvalidVersion {
        name: &'static str,
        #[source]
        source: crate::model::ModelError,
    },

    #[error("invalid thresholds: ask {ask} / accept {accept} (need finite values with ask <= accept)")]
    InvalidThresholds { ask: f64, accept: f64 },

    #[error("version range is empty: min {min} > max {max}")]
    EmptyVersionRange { min: String, max: String },

    #[error("worker count must be at least 1")]
    NoWorkers,

    /// A setting the chosen command needs was not provided.
    #[error("missing required setting: {name}")]
    MissingSetting { name: &'static str },

    /// Specified path does not exist on the filesystem.
    #[error("path does not exist: {path}")]
    PathNotFound { path: PathBuf },

    /// Path exists but is not a file (when a file was expected).
    #[error("path is not a file: {path}")]
    NotAFile { path: PathBuf },

    /// Path exists but is not a directory (when a directory was expected).
    #[error("path is not a directory: {path}")]
    NotADirectory { path: PathBuf },
}
