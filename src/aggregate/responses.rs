use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::model::PatchId;
use crate::storage::write_atomic;

use super::clusters::SplitCluster;
use super::error::{AggregateError, AggregateResult};

/// Mail thread structure: who replied to which message, and raw messages.
pub trait ReplyIndex {
    fn replies(&self, message: &PatchId) -> &[PatchId];
    fn raw(&self, message: &PatchId) -> Option<&str>;
}

/// `{ "replies": { "<msg>": ["<reply>", ...] }, "messages": { "<msg>": "<raw>" } }`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JsonReplyIndex {
    #[serde(default)]
    replies: HashMap<PatchId, Vec<PatchId>>,
    #[serde(default)]
    messages: HashMap<PatchId, String>,
}

impl JsonReplyIndex {
    pub fn load(path: &Path) -> AggregateResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| AggregateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let index: Self = serde_json::from_str(&text).map_err(|source| AggregateError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(
            path = %path.display(),
            threads = index.replies.len(),
            messages = index.messages.len(),
            "Loaded reply index"
        );
        Ok(index)
    }

    pub fn insert_reply(&mut self, parent: PatchId, reply: PatchId, raw: impl Into<String>) {
        self.messages.insert(reply.clone(), raw.into());
        self.replies.entry(parent).or_default().push(reply);
    }
}

impl ReplyIndex for JsonReplyIndex {
    fn replies(&self, message: &PatchId) -> &[PatchId] {
        self.replies.get(message).map(Vec::as_slice).unwrap_or(&[])
    }

    fn raw(&self, message: &PatchId) -> Option<&str> {
        self.messages.get(message).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Response {
    pub parent: PatchId,
    pub message_id: PatchId,
    /// `None` when the raw message is not in the index.
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClusterRecord {
    /// An upstream commit with no downstream patch.
    UpstreamOnly {
        cluster_id: usize,
        upstream: BTreeSet<PatchId>,
    },
    /// One downstream patch with the commits it landed as and its replies.
    Patch {
        cluster_id: usize,
        patch_id: PatchId,
        upstream: BTreeSet<PatchId>,
        responses: Vec<Response>,
    },
}

/// Every reply below `root`, breadth first. Each message is expanded once, so
/// reply cycles terminate.
pub fn collect_responses(index: &dyn ReplyIndex, root: &PatchId) -> Vec<Response> {
    let mut responses = Vec::new();
    let mut queue = VecDeque::from([root.clone()]);
    let mut seen = HashSet::new();

    while let Some(message) = queue.pop_front() {
        if !seen.insert(message.clone()) {
            continue;
        }
        let replies = index.replies(&message);
        if replies.is_empty() {
            debug!(message = %message, "No replies");
            continue;
        }
        for reply in replies {
            responses.push(Response {
                parent: message.clone(),
                message_id: reply.clone(),
                message: index.raw(reply).map(str::to_string),
            });
            queue.push_back(reply.clone());
        }
    }

    responses
}

pub fn response_records(clusters: &[SplitCluster], index: &dyn ReplyIndex) -> Vec<ClusterRecord> {
    let mut records = Vec::new();
    for cluster in clusters {
        if cluster.downstream.is_empty() {
            records.push(ClusterRecord::UpstreamOnly {
                cluster_id: cluster.id,
                upstream: cluster.upstream.clone(),
            });
            continue;
        }
        for patch in &cluster.downstream {
            records.push(ClusterRecord::Patch {
                cluster_id: cluster.id,
                patch_id: patch.clone(),
                upstream: cluster.upstream.clone(),
                responses: collect_responses(index, patch),
            });
        }
    }
    records
}

pub fn write_records(path: &Path, records: &[ClusterRecord]) -> AggregateResult<()> {
    let json = serde_json::to_vec_pretty(records).map_err(AggregateError::Encode)?;
    write_atomic(path, &json)?;
    info!(path = %path.display(), records = records.len(), "Wrote response records");
    Ok(())
}
