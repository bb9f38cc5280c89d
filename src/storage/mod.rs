//! Persistence of confirmed decisions.
//!
//! Each store is kept as a human-editable text file and an `rkyv` snapshot
//! that can be mapped and validated without parsing.

mod atomic;
pub mod error;
pub mod mmap;
mod model;
mod store;
mod text;

#[cfg(test)]
mod tests;

pub use atomic::write_atomic;
pub use error::{StorageError, StorageResult};
pub use model::{ArchivedPairSnapshot, PairSnapshot, SNAPSHOT_FORMAT_VERSION, SnapshotPair};
pub use store::{DecisionStore, PairStore, StoreLayout};
pub use text::{parse_pairs, render_pairs};
