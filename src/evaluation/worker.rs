use std::collections::HashSet;

use tracing::{debug, warn};

use crate::model::{PatchId, VersionRange, VersionedStack};
use crate::registry::ResolvedPairs;
use crate::scoring::Scorer;

use super::error::{EvaluationError, EvaluationResult};
use super::table::{CandidateScore, EvaluationTable};

/// Disjoint slice of origin patches, named after the stack it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub name: String,
    pub origins: Vec<PatchId>,
}

/// One partition per in-range stack. An id present in several stacks is kept
/// only in the first stack (in manifest order) that lists it, so no two
/// partitions share an origin. Stacks left empty by that rule are dropped.
pub fn partition_origins(stacks: &[VersionedStack], range: &VersionRange) -> Vec<Partition> {
    let mut claimed: HashSet<&PatchId> = HashSet::new();
    let mut partitions = Vec::new();

    for stack in stacks.iter().filter(|s| range.contains(&s.version)) {
        let origins: Vec<PatchId> = stack
            .patches
            .iter()
            .filter(|id| claimed.insert(*id))
            .cloned()
            .collect();
        if origins.is_empty() {
            debug!(stack = %stack.version, "Stack has no unclaimed origins, skipping");
            continue;
        }
        partitions.push(Partition {
            name: stack.version.to_string(),
            origins,
        });
    }

    partitions
}

/// Every patch of every stack, first occurrence wins.
pub fn candidate_pool(stacks: &[VersionedStack]) -> Vec<PatchId> {
    let mut seen: HashSet<&PatchId> = HashSet::new();
    stacks
        .iter()
        .flat_map(|s| s.patches.iter())
        .filter(|id| seen.insert(*id))
        .cloned()
        .collect()
}

/// Output of one worker.
#[derive(Debug, Clone)]
pub struct PartitionResult {
    pub partition: String,
    pub table: EvaluationTable,
    pub scored: usize,
    pub unscored: usize,
    /// Pairs not scored because they were already decided.
    pub skipped: usize,
}

impl PartitionResult {
    /// `true` when the partition had work and none of it produced a score.
    pub fn failed_entirely(&self) -> bool {
        self.scored == 0 && self.unscored > 0
    }
}

/// Scores every `origin x candidate` pair of `partition` (excluding
/// `origin == candidate` and already-decided pairs).
///
/// A scorer error affects only its own pair: it is recorded as unscored and the
/// worker moves on.
pub fn evaluate_partition(
    scorer: &dyn Scorer,
    partition: &Partition,
    candidates: &[PatchId],
    resolved: &ResolvedPairs,
) -> PartitionResult {
    let mut table = EvaluationTable::new();
    let mut scored = 0;
    let mut unscored = 0;
    let mut skipped = 0;

    for origin in &partition.origins {
        let mut row = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            if candidate == origin {
                continue;
            }
            if resolved.is_resolved(origin, candidate) {
                skipped += 1;
                continue;
            }

            match scorer.score(origin, candidate) {
                Ok(score) if score.is_finite() => {
                    scored += 1;
                    row.push(CandidateScore::scored(candidate.clone(), score));
                }
                Ok(score) => {
                    unscored += 1;
                    warn!(origin = %origin, candidate = %candidate, score, "Non-finite score, marking unscored");
                    row.push(CandidateScore::unscored(
                        candidate.clone(),
                        format!("non-finite score {}", score),
                    ));
                }
                Err(e) => {
                    unscored += 1;
                    warn!(origin = %origin, candidate = %candidate, error = %e, "Scoring failed, marking unscored");
                    row.push(CandidateScore::unscored(candidate.clone(), e.to_string()));
                }
            }
        }

        table.insert(origin.clone(), row);
    }

    debug!(
        partition = %partition.name,
        origins = partition.origins.len(),
        scored,
        unscored,
        skipped,
        "Partition evaluated"
    );

    PartitionResult {
        partition: partition.name.clone(),
        table,
        scored,
        unscored,
        skipped,
    }
}

/// Origin partitions plus the shared candidate pool for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationPlan {
    pub partitions: Vec<Partition>,
    pub candidates: Vec<PatchId>,
}

impl EvaluationPlan {
    /// Fails when `range` cannot match or selects no origins; out-of-range
    /// stacks still contribute candidates.
    pub fn build(stacks: &[VersionedStack], range: &VersionRange) -> EvaluationResult<Self> {
        if !range.is_satisfiable() {
            return Err(EvaluationError::UnsatisfiableRange {
                range: range.to_string(),
            });
        }

        let partitions = partition_origins(stacks, range);
        if partitions.is_empty() {
            return Err(EvaluationError::NoOrigins {
                range: range.to_string(),
            });
        }

        Ok(Self {
            partitions,
            candidates: candidate_pool(stacks),
        })
    }

    pub fn origin_count(&self) -> usize {
        self.partitions.iter().map(|p| p.origins.len()).sum()
    }

    pub fn partition_names(&self) -> Vec<String> {
        self.partitions.iter().map(|p| p.name.clone()).collect()
    }
}
