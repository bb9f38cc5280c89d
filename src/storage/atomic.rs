use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use super::error::{StorageError, StorageResult};

/// Replaces `path` with `bytes` via a synced temp file in the same directory
/// and a rename. The temp file is removed if anything fails before the rename.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> StorageResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| StorageError::Io(e.error))?;

    debug!(path = %path.display(), bytes = bytes.len(), "Wrote file atomically");
    Ok(())
}
