use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::model::PatchId;

use super::error::{ScoringError, ScoringResult};
use super::scorer::Scorer;

/// Deterministic scorer for tests.
///
/// Scores are symmetric unless both directions are set explicitly. Pairs marked
/// as failing return an error; origins marked as crashing panic, which takes
/// the whole worker task down.
#[derive(Debug, Default)]
pub struct StaticScorer {
    scores: HashMap<(PatchId, PatchId), f64>,
    fallback: Option<f64>,
    failing: HashSet<(PatchId, PatchId)>,
    crashing_origins: HashSet<PatchId>,
    calls: AtomicUsize,
}

impl StaticScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_score(mut self, a: &PatchId, b: &PatchId, score: f64) -> Self {
        self.scores.insert((a.clone(), b.clone()), score);
        self.scores.entry((b.clone(), a.clone())).or_insert(score);
        self
    }

    /// Sets a single direction, overriding any symmetric value.
    pub fn with_directed_score(mut self, origin: &PatchId, candidate: &PatchId, score: f64) -> Self {
        self.scores.insert((origin.clone(), candidate.clone()), score);
        self
    }

    pub fn with_fallback(mut self, score: f64) -> Self {
        self.fallback = Some(score);
        self
    }

    pub fn failing_on(mut self, origin: &PatchId, candidate: &PatchId) -> Self {
        self.failing.insert((origin.clone(), candidate.clone()));
        self
    }

    pub fn crashing_on(mut self, origin: &PatchId) -> Self {
        self.crashing_origins.insert(origin.clone());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl Scorer for StaticScorer {
    fn score(&self, origin: &PatchId, candidate: &PatchId) -> ScoringResult<f64> {
        self.calls.fetch_add(1, Ordering::Relaxed);

        if self.crashing_origins.contains(origin) {
            panic!("scorer crashed on origin {}", origin);
        }
        if self.failing.contains(&(origin.clone(), candidate.clone())) {
            return Err(ScoringError::ComputationFailed {
                reason: format!("injected failure for {} -> {}", origin, candidate),
            });
        }

        self.scores
            .get(&(origin.clone(), candidate.clone()))
            .copied()
            .or(self.fallback)
            .ok_or_else(|| ScoringError::MissingScore {
                origin: origin.to_string(),
                candidate: candidate.to_string(),
            })
    }
}
