//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `PASTA_*` environment variables;
//! command-line flags override those in turn.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::path::{Path, PathBuf};

use crate::model::{Version, VersionRange};
use crate::scoring::{DEFAULT_ACCEPT_THRESHOLD, DEFAULT_ASK_THRESHOLD, Thresholds};

/// Run configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the decision stores. Default: `./.pasta`.
    pub data_dir: PathBuf,

    /// Patch-stack manifest (JSON). Default: `./patch-stacks.json`.
    pub manifest_path: PathBuf,

    /// Precomputed `origin candidate score` table.
    pub scores_path: Option<PathBuf>,

    /// Directory of `<id>.patch` files shown when asking.
    pub patch_dir: Option<PathBuf>,

    pub ask_threshold: f64,
    pub accept_threshold: f64,

    /// Lowest origin stack version (inclusive).
    pub version_min: Option<Version>,
    /// Highest origin stack version (inclusive).
    pub version_max: Option<Version>,

    /// Scoring workers. Default: available parallelism.
    pub workers: usize,

    /// Max cached patch details. Default: `10_000`.
    pub catalog_capacity: u64,

    /// Max memoized scores. Default: `1_000_000`.
    pub score_cache_capacity: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./.pasta"),
            manifest_path: PathBuf::from("./patch-stacks.json"),
            scores_path: None,
            patch_dir: None,
            ask_threshold: DEFAULT_ASK_THRESHOLD,
            accept_threshold: DEFAULT_ACCEPT_THRESHOLD,
            version_min: None,
            version_max: None,
            workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            catalog_capacity: 10_000,
            score_cache_capacity: 1_000_000,
        }
    }
}

impl Config {
    const ENV_DATA_DIR: &'static str = "PASTA_DATA_DIR";
    const ENV_MANIFEST: &'static str = "PASTA_MANIFEST";
    const ENV_SCORES: &'static str = "PASTA_SCORES";
    const ENV_PATCH_DIR: &'static str = "PASTA_PATCH_DIR";
    const ENV_ASK_THRESHOLD: &'static str = "PASTA_ASK_THRESHOLD";
    const ENV_ACCEPT_THRESHOLD: &'static str = "PASTA_ACCEPT_THRESHOLD";
    const ENV_VERSION_MIN: &'static str = "PASTA_VERSION_MIN";
    const ENV_VERSION_MAX: &'static str = "PASTA_VERSION_MAX";
    const ENV_WORKERS: &'static str = "PASTA_WORKERS";
    const ENV_CATALOG_CAPACITY: &'static str = "PASTA_CATALOG_CAPACITY";
    const ENV_SCORE_CACHE_CAPACITY: &'static str = "PASTA_SCORE_CACHE_CAPACITY";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let data_dir = Self::parse_path_from_env(Self::ENV_DATA_DIR, defaults.data_dir);
        let manifest_path = Self::parse_path_from_env(Self::ENV_MANIFEST, defaults.manifest_path);
        let scores_path = Self::parse_optional_path_from_env(Self::ENV_SCORES);
        let patch_dir = Self::parse_optional_path_from_env(Self::ENV_PATCH_DIR);
        let ask_threshold =
            Self::parse_threshold_from_env(Self::ENV_ASK_THRESHOLD, defaults.ask_threshold)?;
        let accept_threshold =
            Self::parse_threshold_from_env(Self::ENV_ACCEPT_THRESHOLD, defaults.accept_threshold)?;
        let version_min = Self::parse_version_from_env(Self::ENV_VERSION_MIN)?;
        let version_max = Self::parse_version_from_env(Self::ENV_VERSION_MAX)?;
        let workers = Self::parse_integer_from_env(Self::ENV_WORKERS, defaults.workers)?;
        let catalog_capacity =
            Self::parse_integer_from_env(Self::ENV_CATALOG_CAPACITY, defaults.catalog_capacity)?;
        let score_cache_capacity = Self::parse_integer_from_env(
            Self::ENV_SCORE_CACHE_CAPACITY,
            defaults.score_cache_capacity,
        )?;

        Ok(Self {
            data_dir,
            manifest_path,
            scores_path,
            patch_dir,
            ask_threshold,
            accept_threshold,
            version_min,
            version_max,
            workers,
            catalog_capacity,
            score_cache_capacity,
        })
    }

    /// Checks invariants and paths (does not create directories).
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.thresholds()?;

        if let (Some(min), Some(max)) = (&self.version_min, &self.version_max)
            && min > max
        {
            return Err(ConfigError::EmptyVersionRange {
                min: min.to_string(),
                max: max.to_string(),
            });
        }

        if self.workers == 0 {
            return Err(ConfigError::NoWorkers);
        }

        if self.data_dir.exists() && !self.data_dir.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: self.data_dir.clone(),
            });
        }

        if let Some(ref path) = self.scores_path {
            Self::require_file(path)?;
        }

        if let Some(ref path) = self.patch_dir {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }

        Ok(())
    }

    /// Validation for commands that score: manifest and score table must exist.
    pub fn validate_for_run(&self) -> Result<(), ConfigError> {
        self.validate()?;
        Self::require_file(&self.manifest_path)?;
        if self.scores_path.is_none() {
            return Err(ConfigError::MissingSetting {
                name: Self::ENV_SCORES,
            });
        }
        Ok(())
    }

    pub fn thresholds(&self) -> Result<Thresholds, ConfigError> {
        Thresholds::new(self.ask_threshold, self.accept_threshold).map_err(|_| {
            ConfigError::InvalidThresholds {
                ask: self.ask_threshold,
                accept: self.accept_threshold,
            }
        })
    }

    pub fn version_range(&self) -> VersionRange {
        VersionRange::new(self.version_min.clone(), self.version_max.clone())
    }

    fn require_file(path: &Path) -> Result<(), ConfigError> {
        if !path.exists() {
            return Err(ConfigError::PathNotFound {
                path: path.to_path_buf(),
            });
        }
        if !path.is_file() {
            return Err(ConfigError::NotAFile {
                path: path.to_path_buf(),
            });
        }
        Ok(())
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    fn parse_threshold_from_env(name: &'static str, default: f64) -> Result<f64, ConfigError> {
        match env::var(name) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|e| ConfigError::ThresholdParseError {
                    name,
                    value,
                    source: e,
                }),
            Err(_) => Ok(default),
        }
    }

    fn parse_integer_from_env<T>(name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: std::str::FromStr<Err = std::num::ParseIntError>,
    {
        match env::var(name) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|e| ConfigError::IntegerParseError {
                    name,
                    value,
                    source: e,
                }),
            Err(_) => Ok(default),
        }
    }

    fn parse_version_from_env(name: &'static str) -> Result<Option<Version>, ConfigError> {
        match env::var(name) {
            Ok(value) if !value.trim().is_empty() => Version::parse(&value)
                .map(Some)
                .map_err(|source| ConfigError::InvalidVersion { name, source }),
            _ => Ok(None),
        }
    }
}
