use serde::{Deserialize, Serialize};

use super::{PatchId, Version};

/// Ordered patch ids of one release line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionedStack {
    pub version: Version,
    pub patches: Vec<PatchId>,
}

impl VersionedStack {
    pub fn new(version: Version, patches: Vec<PatchId>) -> Self {
        Self { version, patches }
    }

    pub fn len(&self) -> usize {
        self.patches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }
}
