use std::collections::{HashMap, HashSet};

use crate::model::{ModelResult, PairKey, PatchId};

/// Pairs confirmed NOT to be the same patch. Order independent; keeps
/// insertion order so the persisted form only ever grows at the end.
#[derive(Debug, Clone, Default)]
pub struct RejectionCache {
    order: Vec<PairKey>,
    set: HashSet<PairKey>,
    partners: HashMap<PatchId, Vec<PatchId>>,
}

impl RejectionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Duplicate pairs are collapsed.
    pub fn from_persisted_form<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = PairKey>,
    {
        let mut cache = Self::new();
        for pair in pairs {
            cache.insert(pair);
        }
        cache
    }

    pub fn to_persisted_form(&self) -> &[PairKey] {
        &self.order
    }

    pub fn is_rejected(&self, a: &PatchId, b: &PatchId) -> bool {
        PairKey::of(a, b).is_ok_and(|key| self.set.contains(&key))
    }

    pub fn contains(&self, pair: &PairKey) -> bool {
        self.set.contains(pair)
    }

    /// Records `a` and `b` as different patches. Idempotent; returns `true`
    /// if the pair was not yet rejected. Fails for `a == b`.
    pub fn reject(&mut self, a: &PatchId, b: &PatchId) -> ModelResult<bool> {
        Ok(self.insert(PairKey::of(a, b)?))
    }

    pub fn insert(&mut self, pair: PairKey) -> bool {
        if !self.set.insert(pair.clone()) {
            return false;
        }
        for (id, other) in [(pair.low(), pair.high()), (pair.high(), pair.low())] {
            self.partners
                .entry(id.clone())
                .or_default()
                .push(other.clone());
        }
        self.order.push(pair);
        true
    }

    /// Ids rejected against `id`.
    pub fn partners(&self, id: &PatchId) -> &[PatchId] {
        self.partners.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = &PairKey> {
        self.order.iter()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
