use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::evaluation::PartitionFailure;
use crate::rating::{DecisionCounts, RatingOutcome};
use crate::scoring::Thresholds;

use super::Evaluation;

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FATAL: i32 = 1;
pub const EXIT_PARTITIONS_FAILED: i32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnscoredPair {
    pub origin: String,
    pub candidate: String,
    pub reason: String,
}

/// Summary printed at the end of a run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub thresholds: Thresholds,
    pub version_range: String,
    pub partitions: Vec<String>,
    pub origins: usize,
    pub candidates: usize,
    pub scored_pairs: usize,
    pub counts: DecisionCounts,
    pub unscored: Vec<UnscoredPair>,
    pub failed_partitions: Vec<PartitionFailure>,
}

impl RunReport {
    pub fn new(
        run_id: Uuid,
        started_at: DateTime<Utc>,
        thresholds: Thresholds,
        evaluation: &Evaluation,
        rating: &RatingOutcome,
    ) -> Self {
        let table = &evaluation.outcome.table;
        Self {
            run_id,
            started_at,
            finished_at: Utc::now(),
            thresholds,
            version_range: evaluation.range.to_string(),
            partitions: evaluation.partitions.clone(),
            origins: evaluation.origins,
            candidates: evaluation.candidates,
            scored_pairs: table.scored_count(),
            counts: rating.counts,
            unscored: table
                .unscored()
                .into_iter()
                .map(|(origin, candidate, reason)| UnscoredPair {
                    origin: origin.to_string(),
                    candidate: candidate.to_string(),
                    reason: reason.to_string(),
                })
                .collect(),
            failed_partitions: evaluation.outcome.failures.clone(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.failed_partitions.is_empty()
    }

    /// `2` when any partition failed, `0` otherwise. Unscored pairs alone do
    /// not fail a run.
    pub fn exit_code(&self) -> i32 {
        if self.is_complete() {
            EXIT_SUCCESS
        } else {
            EXIT_PARTITIONS_FAILED
        }
    }
}
