//! Pasta library crate (used by the `pasta` binary and integration tests).
//!
//! Finds patches that recur across the release lines of a codebase and groups
//! them into clusters of "the same logical patch".
//!
//! # Flow
//!
//! 1. [`manifest`] lists the patch stacks of every release line.
//! 2. [`evaluation`] scores origin patches of the selected lines against all
//!    candidates on a worker pool, isolating failures per pair and per partition.
//! 3. [`rating`] walks the scored pairs from highest score down, auto-accepting,
//!    auto-rejecting or asking a human, and records decisions in the
//!    [`registry`] (equivalences as union-find, rejections as a pair set).
//! 4. [`storage`] persists both decision stores as text plus an `rkyv` snapshot.
//! 5. [`aggregate`] reports on the resulting clusters.
//!
//! ## Test/Mock Support
//! Mock scorers, raters and checkpoints are available behind
//! `#[cfg(any(test, feature = "mock"))]`.

pub mod aggregate;
pub mod catalog;
pub mod config;
pub mod evaluation;
pub mod hashing;
pub mod manifest;
pub mod model;
pub mod pipeline;
pub mod rating;
pub mod registry;
pub mod scoring;
pub mod storage;

pub use catalog::{CachedCatalog, DirectoryCatalog, ManifestCatalog, PatchCatalog, PatchDetails};
pub use config::{Config, ConfigError};
pub use evaluation::{EvaluationTable, PoolOutcome, WorkerPool};
pub use hashing::{content_digest, digest_hex};
pub use manifest::{ManifestFile, StackSource};
pub use model::{PairKey, PatchId, ScorePair, Version, VersionRange, VersionedStack};
pub use pipeline::{Pipeline, PipelineError, RunContext, RunReport};
pub use rating::{Checkpoint, DecisionCounts, PairState, Rater, TerminalRater, Verdict};
#[cfg(any(test, feature = "mock"))]
pub use rating::{MemoryCheckpoint, ScriptedRater};
pub use registry::{DecisionState, EquivalenceRegistry, RejectionCache};
#[cfg(any(test, feature = "mock"))]
pub use scoring::StaticScorer;
pub use scoring::{Classification, Scorer, TableScorer, Thresholds};
pub use storage::{DecisionStore, StorageError, StoreLayout};
