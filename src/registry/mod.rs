//! Persistent decision stores: confirmed equivalences and confirmed rejections.
//!
//! [`EquivalenceRegistry`] keeps the "same patch" relation transitively closed
//! with a union-find arena while remembering only the edges that caused merges.
//! [`RejectionCache`] holds pairs a human said are different. [`DecisionState`]
//! owns both and enforces that no pair is ever related and rejected at once.

mod equivalence;
pub mod error;
mod rejection;
mod state;


pub use equivalence::{ClusterId, EquivalenceRegistry};
pub use error::{RegistryError, RegistryResult};
pub use rejection::RejectionCache;
pub use state::{DecisionState, Resolution, ResolvedPairs};
