use std::sync::Arc;

use moka::sync::Cache;
use tracing::debug;

use crate::model::PatchId;

use super::{PatchCatalog, PatchDetails};

/// Bounded in-memory cache in front of a slower catalog.
///
/// Misses are not cached, so a patch file that appears later is picked up.
pub struct CachedCatalog<C> {
    inner: C,
    entries: Cache<PatchId, Arc<PatchDetails>>,
}

impl<C: PatchCatalog> CachedCatalog<C> {
    pub const DEFAULT_CAPACITY: u64 = 10_000;

    pub fn new(inner: C) -> Self {
        Self::with_capacity(inner, Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(inner: C, capacity: u64) -> Self {
        Self {
            inner,
            entries: Cache::builder().max_capacity(capacity).build(),
        }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn entry_count(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }
}

impl<C: PatchCatalog> PatchCatalog for CachedCatalog<C> {
    fn describe(&self, id: &PatchId) -> Option<Arc<PatchDetails>> {
        if let Some(hit) = self.entries.get(id) {
            return Some(hit);
        }
        let details = self.inner.describe(id)?;
        self.entries.insert(id.clone(), Arc::clone(&details));
        Some(details)
    }

    fn precache(&self, ids: &[PatchId]) {
        let mut loaded = 0usize;
        for id in ids {
            if self.entries.contains_key(id) {
                continue;
            }
            if let Some(details) = self.inner.describe(id) {
                self.entries.insert(id.clone(), details);
                loaded += 1;
            }
        }
        debug!(requested = ids.len(), loaded, "Precached patch details");
    }
}
