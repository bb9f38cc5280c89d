//! Human-readable patch details shown next to ASK prompts.
//!
//! The catalog is optional context: a missing entry never blocks a decision.

mod cached;
mod directory;
mod error;

#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::model::PatchId;

pub use cached::CachedCatalog;
pub use directory::DirectoryCatalog;
pub use error::{CatalogError, CatalogResult};

/// What a rater sees about one patch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchDetails {
    pub subject: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub body: String,
}

impl PatchDetails {
    /// Splits raw patch text: first non-empty line is the subject, the rest the body.
    pub fn from_text(text: &str) -> Self {
        let mut lines = text.lines().skip_while(|l| l.trim().is_empty());
        let subject = lines.next().unwrap_or_default().trim().to_string();
        let body = lines.collect::<Vec<_>>().join("\n");
        Self {
            subject,
            author: None,
            body,
        }
    }
}

pub trait PatchCatalog: Send + Sync {
    fn describe(&self, id: &PatchId) -> Option<Arc<PatchDetails>>;

    /// Hint that `ids` are about to be described.
    fn precache(&self, _ids: &[PatchId]) {}
}

/// Details carried inline by the stack manifest.
#[derive(Debug, Clone, Default)]
pub struct ManifestCatalog {
    entries: HashMap<PatchId, Arc<PatchDetails>>,
}

impl ManifestCatalog {
    pub fn new(entries: HashMap<PatchId, PatchDetails>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(id, details)| (id, Arc::new(details)))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PatchCatalog for ManifestCatalog {
    fn describe(&self, id: &PatchId) -> Option<Arc<PatchDetails>> {
        self.entries.get(id).cloned()
    }
}
