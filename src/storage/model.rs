//! Machine-optimized store format.

use rkyv::{Archive, Deserialize, Serialize};

use crate::hashing::DIGEST_LEN;

/// Bumped whenever the archived layout changes; older snapshots are ignored.
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// One stored pair, ids as plain strings.
#[derive(Archive, Deserialize, Serialize, Debug, PartialEq, Eq, Clone)]
pub struct SnapshotPair {
    pub low: String,
    pub high: String,
}

/// Binary mirror of a text pair store.
///
/// `source_digest` is the BLAKE3 digest of the text file this snapshot was
/// written alongside; a mismatch means the text was edited since.
#[derive(Archive, Deserialize, Serialize, Debug, PartialEq, Eq, Clone)]
pub struct PairSnapshot {
    pub format_version: u32,
    pub source_digest: [u8; DIGEST_LEN],
    pub pairs: Vec<SnapshotPair>,
}

impl PairSnapshot {
    pub fn new(source_digest: [u8; DIGEST_LEN], pairs: Vec<SnapshotPair>) -> Self {
        Self {
            format_version: SNAPSHOT_FORMAT_VERSION,
            source_digest,
            pairs,
        }
    }
}
