use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::model::{PairKey, PatchId};

use super::equivalence::{ClusterId, EquivalenceRegistry};
use super::error::{RegistryError, RegistryResult};
use super::rejection::RejectionCache;

/// Why a pair needs no further decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Related,
    Rejected,
}

/// Both decision stores, kept mutually consistent.
///
/// Invariant: no rejected pair is ever related in the registry.
#[derive(Debug, Clone, Default)]
pub struct DecisionState {
    registry: EquivalenceRegistry,
    rejections: RejectionCache,
}

/// A cluster handle that also covers ids the registry has never seen.
#[derive(Debug, PartialEq, Eq)]
enum Representative<'a> {
    Cluster(ClusterId),
    Loose(&'a PatchId),
}

impl DecisionState {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Combines loaded stores, refusing any state where a pair is both related
    /// and rejected.
    pub fn new(registry: EquivalenceRegistry, rejections: RejectionCache) -> RegistryResult<Self> {
        let state = Self {
            registry,
            rejections,
        };
        let conflicts = state.conflicts();
        if !conflicts.is_empty() {
            return Err(RegistryError::Conflict { pairs: conflicts });
        }
        Ok(state)
    }

    pub fn registry(&self) -> &EquivalenceRegistry {
        &self.registry
    }

    pub fn rejections(&self) -> &RejectionCache {
        &self.rejections
    }

    pub fn into_parts(self) -> (EquivalenceRegistry, RejectionCache) {
        (self.registry, self.rejections)
    }

    /// Rejected pairs that the registry currently relates.
    pub fn conflicts(&self) -> Vec<PairKey> {
        self.rejections
            .iter()
            .filter(|pair| self.registry.are_related(pair.low(), pair.high()))
            .cloned()
            .collect()
    }

    pub fn resolution(&self, a: &PatchId, b: &PatchId) -> Option<Resolution> {
        if self.registry.are_related(a, b) {
            Some(Resolution::Related)
        } else if self.rejections.is_rejected(a, b) {
            Some(Resolution::Rejected)
        } else {
            None
        }
    }

    /// The rejected pair that merging `a` and `b` would relate, if any.
    ///
    /// Walks the rejections of the smaller cluster only.
    pub fn would_conflict(&self, a: &PatchId, b: &PatchId) -> Option<PairKey> {
        if self.registry.are_related(a, b) {
            return None;
        }

        let (small, other) = if self.registry.cluster_size(a) <= self.registry.cluster_size(b) {
            (a, b)
        } else {
            (b, a)
        };
        let target = self.representative(other);

        self.registry.members(small).into_iter().find_map(|member| {
            self.rejections
                .partners(&member)
                .iter()
                .find(|partner| self.representative(partner) == target)
                .and_then(|partner| PairKey::of(&member, partner).ok())
        })
    }

    /// Records `a ~ b`. Returns whether two clusters merged.
    pub fn confirm(&mut self, a: &PatchId, b: &PatchId) -> RegistryResult<bool> {
        let pair = PairKey::of(a, b)?;
        if let Some(rejected) = self.would_conflict(a, b) {
            return Err(RegistryError::WouldRelateRejected { pair, rejected });
        }
        let merged = self.registry.union(a, b);
        debug!(pair = %pair, merged, "Confirmed equivalence");
        Ok(merged)
    }

    /// Records `a !~ b`. Returns whether the pair was newly rejected.
    pub fn deny(&mut self, a: &PatchId, b: &PatchId) -> RegistryResult<bool> {
        let pair = PairKey::of(a, b)?;
        if self.registry.are_related(a, b) {
            return Err(RegistryError::AlreadyRelated { pair });
        }
        let inserted = self.rejections.insert(pair.clone());
        debug!(pair = %pair, inserted, "Recorded rejection");
        Ok(inserted)
    }

    /// Immutable view handed to evaluation workers.
    pub fn resolved_pairs(&self) -> ResolvedPairs {
        let mut cluster = HashMap::new();
        for members in self.registry.clusters() {
            let Some(first) = members.first().cloned() else {
                continue;
            };
            for member in members {
                cluster.insert(member, first.clone());
            }
        }
        ResolvedPairs {
            cluster,
            rejected: self.rejections.iter().cloned().collect(),
        }
    }

    fn representative<'a>(&self, id: &'a PatchId) -> Representative<'a> {
        match self.registry.cluster_of(id) {
            Some(cluster) => Representative::Cluster(cluster),
            None => Representative::Loose(id),
        }
    }
}

/// Read-only snapshot of already-decided pairs, shareable across workers.
#[derive(Debug, Clone, Default)]
pub struct ResolvedPairs {
    cluster: HashMap<PatchId, PatchId>,
    rejected: HashSet<PairKey>,
}

impl ResolvedPairs {
    pub fn is_resolved(&self, a: &PatchId, b: &PatchId) -> bool {
        let related = match (self.cluster.get(a), self.cluster.get(b)) {
            (Some(ca), Some(cb)) => ca == cb,
            _ => false,
        };
        related || PairKey::of(a, b).is_ok_and(|key| self.rejected.contains(&key))
    }

    pub fn len(&self) -> usize {
        self.cluster.len() + self.rejected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cluster.is_empty() && self.rejected.is_empty()
    }
}
