//! Line-oriented pair format: one `left right` pair per line.

use std::fmt::Write as _;
use std::io::BufRead;
use std::path::Path;

use crate::model::{PairKey, PatchId};

use super::error::{StorageError, StorageResult};

/// Parses a text store. Blank lines and `#` comments are skipped; every other
/// line must hold exactly two distinct valid ids.
pub fn parse_pairs<R: BufRead>(reader: R, path: &Path) -> StorageResult<Vec<PairKey>> {
    let mut pairs = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let malformed = |reason: String| StorageError::Malformed {
            path: path.to_path_buf(),
            line: index + 1,
            reason,
        };

        let tokens: Vec<&str> = trimmed.split_whitespace().collect();
        let [left, right] = tokens.as_slice() else {
            return Err(malformed(format!("expected 2 ids, found {}", tokens.len())));
        };

        let left = PatchId::parse(left).map_err(|e| malformed(e.to_string()))?;
        let right = PatchId::parse(right).map_err(|e| malformed(e.to_string()))?;
        pairs.push(PairKey::new(left, right).map_err(|e| malformed(e.to_string()))?);
    }

    Ok(pairs)
}

/// Renders `pairs` under a single `# header` line.
pub fn render_pairs(header: &str, pairs: &[PairKey]) -> String {
    let mut out = String::with_capacity(header.len() + 3 + pairs.len() * 32);
    let _ = writeln!(out, "# {}", header);
    for pair in pairs {
        let _ = writeln!(out, "{} {}", pair.low(), pair.high());
    }
    out
}
