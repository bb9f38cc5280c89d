//! Similarity scores and their classification.
//!
//! The scorer itself is an external collaborator: this crate only relies on it
//! returning a real number where larger means "more similar". [`Thresholds`]
//! turns that number into one of three outcomes.
//!
//! # Direction
//!
//! `score(a, b)` is not assumed to equal `score(b, a)`. Callers that need a
//! single value per unordered pair must reconcile both directions themselves
//! (see [`crate::evaluation::EvaluationTable::scored_pairs`]).

mod cache;
pub mod classify;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod scorer;


pub use cache::CachedScorer;
pub use classify::{Classification, DEFAULT_ACCEPT_THRESHOLD, DEFAULT_ASK_THRESHOLD, Thresholds};
pub use error::{ScoringError, ScoringResult};
#[cfg(any(test, feature = "mock"))]
pub use mock::StaticScorer;
pub use scorer::{Scorer, TableScorer};
