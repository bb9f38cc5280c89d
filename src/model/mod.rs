//! Core identifiers and input shapes.
//!
//! A [`PatchId`] names one concrete version of a patch. Similarity between two
//! ids is computed elsewhere; equality here is identity only. [`PairKey`] is the
//! unordered pair identity used for deduplication and both decision stores.

pub mod error;
mod patch;
mod stack;
mod version;


pub use error::{ModelError, ModelResult};
pub use patch::{PairKey, PatchId, ScorePair};
pub use stack::VersionedStack;
pub use version::{Version, VersionRange};
