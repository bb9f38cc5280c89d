//! Interactive rating of scored pairs.
//!
//! Each pair is skipped if already decided, otherwise classified: rejects are
//! dropped without being recorded, accepts are merged, and asks go to a
//! [`Rater`]. Decisions land in a [`DecisionState`](crate::registry::DecisionState)
//! and are pushed to a [`Checkpoint`] as they happen.

mod checkpoint;
mod error;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod outcome;
mod rater;
mod session;
mod terminal;


pub use checkpoint::Checkpoint;
pub use error::{RatingError, RatingResult};
#[cfg(any(test, feature = "mock"))]
pub use mock::{MemoryCheckpoint, ScriptedRater};
pub use outcome::{DecisionCounts, PairOutcome, PairState, RatingOutcome, SkipReason};
pub use rater::{DeferAll, Rater, RatingPrompt, Verdict};
pub use session::RatingSession;
pub use terminal::TerminalRater;
