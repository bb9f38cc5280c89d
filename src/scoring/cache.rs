use moka::sync::Cache;

use crate::model::PatchId;

use super::error::ScoringResult;
use super::scorer::Scorer;

/// Memoizes successful scores of a slower scorer. Failures are not cached.
pub struct CachedScorer<S> {
    inner: S,
    scores: Cache<(PatchId, PatchId), f64>,
}

impl<S: Scorer> CachedScorer<S> {
    pub const DEFAULT_CAPACITY: u64 = 1_000_000;

    pub fn new(inner: S) -> Self {
        Self::with_capacity(inner, Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(inner: S, capacity: u64) -> Self {
        Self {
            inner,
            scores: Cache::builder().max_capacity(capacity).build(),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: Scorer> Scorer for CachedScorer<S> {
    fn score(&self, origin: &PatchId, candidate: &PatchId) -> ScoringResult<f64> {
        let key = (origin.clone(), candidate.clone());
        if let Some(score) = self.scores.get(&key) {
            return Ok(score);
        }
        let score = self.inner.score(origin, candidate)?;
        self.scores.insert(key, score);
        Ok(score)
    }

    fn precache(&self, ids: &[PatchId]) {
        self.inner.precache(ids);
    }

    fn cached_scores(&self) -> u64 {
        self.scores.run_pending_tasks();
        self.scores.entry_count()
    }
}
