use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::model::{PairKey, PatchId, ScorePair};

/// Result of scoring one directed pair.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreOutcome {
    Scored(f64),
    /// The scorer failed for this pair; excluded from classification.
    Unscored { reason: String },
}

impl ScoreOutcome {
    pub fn score(&self) -> Option<f64> {
        match self {
            ScoreOutcome::Scored(score) => Some(*score),
            ScoreOutcome::Unscored { .. } => None,
        }
    }

    pub fn is_scored(&self) -> bool {
        matches!(self, ScoreOutcome::Scored(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CandidateScore {
    pub candidate: PatchId,
    pub outcome: ScoreOutcome,
}

impl CandidateScore {
    pub fn scored(candidate: PatchId, score: f64) -> Self {
        Self {
            candidate,
            outcome: ScoreOutcome::Scored(score),
        }
    }

    pub fn unscored(candidate: PatchId, reason: impl Into<String>) -> Self {
        Self {
            candidate,
            outcome: ScoreOutcome::Unscored {
                reason: reason.into(),
            },
        }
    }
}

/// Scored candidates first by descending score, ties by candidate id; unscored
/// entries last by candidate id.
fn candidate_order(a: &CandidateScore, b: &CandidateScore) -> Ordering {
    match (&a.outcome, &b.outcome) {
        (ScoreOutcome::Scored(sa), ScoreOutcome::Scored(sb)) => {
            sb.total_cmp(sa).then_with(|| a.candidate.cmp(&b.candidate))
        }
        (ScoreOutcome::Scored(_), ScoreOutcome::Unscored { .. }) => Ordering::Less,
        (ScoreOutcome::Unscored { .. }, ScoreOutcome::Scored(_)) => Ordering::Greater,
        (ScoreOutcome::Unscored { .. }, ScoreOutcome::Unscored { .. }) => {
            a.candidate.cmp(&b.candidate)
        }
    }
}

/// Origin patch -> candidates ordered by descending score.
///
/// Rebuilt every run, never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvaluationTable {
    entries: BTreeMap<PatchId, Vec<CandidateScore>>,
}

impl EvaluationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `candidates` under `origin`. Existing entries for the same origin
    /// are kept and the list is re-sorted; a candidate seen twice keeps its
    /// better outcome.
    pub fn insert(&mut self, origin: PatchId, candidates: Vec<CandidateScore>) {
        let list = self.entries.entry(origin).or_default();
        list.extend(candidates);
        list.sort_by(candidate_order);

        let mut seen = HashSet::new();
        list.retain(|entry| seen.insert(entry.candidate.clone()));
    }

    /// Unions `other` into `self`. With disjoint key sets (the normal case)
    /// every list is taken over untouched.
    pub fn merge(&mut self, other: EvaluationTable) {
        for (origin, candidates) in other.entries {
            if self.entries.contains_key(&origin) {
                self.insert(origin, candidates);
            } else {
                self.entries.insert(origin, candidates);
            }
        }
    }

    pub fn get(&self, origin: &PatchId) -> Option<&[CandidateScore]> {
        self.entries.get(origin).map(Vec::as_slice)
    }

    pub fn origins(&self) -> impl Iterator<Item = &PatchId> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PatchId, &[CandidateScore])> {
        self.entries.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Number of origins.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of directed pairs present, scored or not.
    pub fn pair_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn scored_count(&self) -> usize {
        self.count_where(ScoreOutcome::is_scored)
    }

    pub fn unscored_count(&self) -> usize {
        self.count_where(|outcome| !outcome.is_scored())
    }

    fn count_where(&self, predicate: impl Fn(&ScoreOutcome) -> bool) -> usize {
        self.entries
            .values()
            .flatten()
            .filter(|entry| predicate(&entry.outcome))
            .count()
    }

    /// Directed pairs flagged unscored, with the reason.
    pub fn unscored(&self) -> Vec<(&PatchId, &PatchId, &str)> {
        self.entries
            .iter()
            .flat_map(|(origin, list)| {
                list.iter().filter_map(move |entry| match &entry.outcome {
                    ScoreOutcome::Unscored { reason } => {
                        Some((origin, &entry.candidate, reason.as_str()))
                    }
                    ScoreOutcome::Scored(_) => None,
                })
            })
            .collect()
    }

    /// One [`ScorePair`] per unordered pair, highest score first.
    ///
    /// When both directions were scored the higher score wins; on a tie the
    /// direction whose origin sorts first is kept. Ties between pairs are broken
    /// by pair identity so the order never depends on worker timing.
    pub fn scored_pairs(&self) -> Vec<ScorePair> {
        let mut best: HashMap<PairKey, ScorePair> = HashMap::new();

        for (origin, list) in &self.entries {
            for entry in list {
                let ScoreOutcome::Scored(score) = entry.outcome else {
                    continue;
                };
                let Ok(key) = PairKey::of(origin, &entry.candidate) else {
                    continue;
                };
                let pair = ScorePair::new(origin.clone(), entry.candidate.clone(), score);
                match best.entry(key) {
                    Entry::Occupied(mut slot) => {
                        let current = slot.get();
                        if score > current.score
                            || (score == current.score && pair.origin < current.origin)
                        {
                            slot.insert(pair);
                        }
                    }
                    Entry::Vacant(slot) => {
                        slot.insert(pair);
                    }
                }
            }
        }

        let mut pairs: Vec<(PairKey, ScorePair)> = best.into_iter().collect();
        pairs.sort_by(|(ka, a), (kb, b)| b.score.total_cmp(&a.score).then_with(|| ka.cmp(kb)));
        pairs.into_iter().map(|(_, pair)| pair).collect()
    }
}
