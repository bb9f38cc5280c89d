//! Content digests stamped into persisted snapshots.

/// Length of a full BLAKE3 digest.
pub const DIGEST_LEN: usize = 32;

#[inline]
pub fn content_digest(bytes: &[u8]) -> [u8; DIGEST_LEN] {
    *blake3::hash(bytes).as_bytes()
}

pub fn digest_hex(digest: &[u8; DIGEST_LEN]) -> String {
    blake3::Hash::from_bytes(*digest).to_hex().to_string()
}
