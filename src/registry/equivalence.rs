use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::model::{PairKey, PatchId};

/// Opaque cluster handle. Only meaningful within the registry that produced it
/// and only until the next merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClusterId(usize);

/// Transitively closed "same patch" relation.
///
/// Ids are interned into an arena on first sight; `parent` implements union by
/// size with path compression, and each root owns the slot list of its cluster
/// so membership queries cost the cluster's size, not the arena's. Only edges that actually merged two
/// clusters are kept, in confirmation order, and those are what gets persisted.
#[derive(Debug, Clone, Default)]
pub struct EquivalenceRegistry {
    index: HashMap<PatchId, usize>,
    ids: Vec<PatchId>,
    parent: Vec<usize>,
    /// Slots of each cluster, kept on the root only.
    groups: Vec<Vec<usize>>,
    edges: Vec<PairKey>,
}

impl EquivalenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the relation by replaying unions over `edges`.
    pub fn from_persisted_form<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = PairKey>,
    {
        let mut registry = Self::new();
        for edge in edges {
            registry.union(edge.low(), edge.high());
        }
        registry
    }

    /// Edges that formed the current clusters, in the order they were confirmed.
    pub fn to_persisted_form(&self) -> &[PairKey] {
        &self.edges
    }

    /// Resolves `id` to its cluster, creating a singleton for unseen ids.
    pub fn find(&mut self, id: &PatchId) -> ClusterId {
        let slot = self.intern(id);
        ClusterId(self.root_compressing(slot))
    }

    /// Read-only lookup; `None` for ids never seen in an edge or `find`.
    pub fn cluster_of(&self, id: &PatchId) -> Option<ClusterId> {
        self.index.get(id).map(|&slot| ClusterId(self.root(slot)))
    }

    /// Merges the clusters of `a` and `b`. Returns `true` if they were distinct.
    pub fn union(&mut self, a: &PatchId, b: &PatchId) -> bool {
        let Ok(edge) = PairKey::of(a, b) else {
            // an id is always related to itself
            return false;
        };

        let ra = self.find(a).0;
        let rb = self.find(b).0;
        if ra == rb {
            return false;
        }

        let (root, child) = if self.groups[ra].len() >= self.groups[rb].len() {
            (ra, rb)
        } else {
            (rb, ra)
        };
        self.parent[child] = root;
        let moved = std::mem::take(&mut self.groups[child]);
        self.groups[root].extend(moved);
        self.edges.push(edge);
        true
    }

    pub fn are_related(&self, a: &PatchId, b: &PatchId) -> bool {
        if a == b {
            return true;
        }
        match (self.cluster_of(a), self.cluster_of(b)) {
            (Some(ca), Some(cb)) => ca == cb,
            _ => false,
        }
    }

    /// All members of `id`'s cluster (just `id` when unknown), sorted.
    pub fn members(&self, id: &PatchId) -> Vec<PatchId> {
        let Some(ClusterId(root)) = self.cluster_of(id) else {
            return vec![id.clone()];
        };
        let mut members: Vec<PatchId> = self.groups[root]
            .iter()
            .map(|&slot| self.ids[slot].clone())
            .collect();
        members.sort();
        members
    }

    /// Size of `id`'s cluster; `1` for unknown ids.
    pub fn cluster_size(&self, id: &PatchId) -> usize {
        self.cluster_of(id)
            .map_or(1, |ClusterId(root)| self.groups[root].len())
    }

    /// Every cluster with at least two members, each sorted, ordered by
    /// smallest member. Independent of merge order.
    pub fn clusters(&self) -> Vec<BTreeSet<PatchId>> {
        let ordered: BTreeMap<PatchId, BTreeSet<PatchId>> = self
            .groups
            .iter()
            .filter(|slots| slots.len() > 1)
            .map(|slots| {
                slots
                    .iter()
                    .map(|&slot| self.ids[slot].clone())
                    .collect::<BTreeSet<_>>()
            })
            .filter_map(|members| members.first().cloned().map(|first| (first, members)))
            .collect();
        ordered.into_values().collect()
    }

    /// Number of ids the registry has seen.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains(&self, id: &PatchId) -> bool {
        self.index.contains_key(id)
    }

    fn intern(&mut self, id: &PatchId) -> usize {
        if let Some(&slot) = self.index.get(id) {
            return slot;
        }
        let slot = self.ids.len();
        self.ids.push(id.clone());
        self.parent.push(slot);
        self.groups.push(vec![slot]);
        self.index.insert(id.clone(), slot);
        slot
    }

    fn root(&self, mut slot: usize) -> usize {
        while self.parent[slot] != slot {
            slot = self.parent[slot];
        }
        slot
    }

    fn root_compressing(&mut self, slot: usize) -> usize {
        let root = self.root(slot);
        let mut cursor = slot;
        while self.parent[cursor] != root {
            let next = self.parent[cursor];
            self.parent[cursor] = root;
            cursor = next;
        }
        root
    }
}
