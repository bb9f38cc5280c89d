//! Reports over confirmed clusters, relating downstream patches to the
//! upstream commits they landed as.

mod clusters;
mod error;
mod responses;


use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::model::PatchId;

pub use clusters::{
    CommitCounts, PatchVersionCounts, SplitCluster, split_clusters, with_patch_count,
};
pub use error::{AggregateError, AggregateResult};
pub use responses::{
    ClusterRecord, JsonReplyIndex, ReplyIndex, Response, collect_responses, response_records,
    write_records,
};

/// Reads upstream commit ids, one per line; blank lines and `#` comments are skipped.
pub fn load_upstream(path: &Path) -> AggregateResult<HashSet<PatchId>> {
    let text = fs::read_to_string(path).map_err(|source| AggregateError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut ids = HashSet::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let id = PatchId::parse(line).map_err(|e| AggregateError::MalformedUpstream {
            path: path.to_path_buf(),
            line: index + 1,
            reason: e.to_string(),
        })?;
        ids.insert(id);
    }
    Ok(ids)
}
