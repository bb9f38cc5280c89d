use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tracing::{error, info};

use crate::model::PatchId;
use crate::registry::ResolvedPairs;
use crate::scoring::Scorer;

use super::table::EvaluationTable;
use super::worker::{Partition, evaluate_partition};

/// A partition whose results are missing or entirely unscored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartitionFailure {
    pub partition: String,
    pub reason: String,
}

/// Merged output of all workers.
#[derive(Debug, Clone, Default)]
pub struct PoolOutcome {
    pub table: EvaluationTable,
    pub completed: Vec<String>,
    pub failures: Vec<PartitionFailure>,
}

impl PoolOutcome {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Fixed-size pool of blocking workers, one task per partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerPool {
    workers: usize,
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::with_available_parallelism()
    }
}

impl WorkerPool {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn with_available_parallelism() -> Self {
        Self::new(
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        )
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Submits every partition up front, waits for all of them, then merges.
    ///
    /// Workers never touch shared mutable state; each returns its own table.
    /// A task that panics or is cancelled fails only its own partition.
    pub async fn evaluate(
        &self,
        scorer: Arc<dyn Scorer>,
        partitions: Vec<Partition>,
        candidates: Arc<[PatchId]>,
        resolved: Arc<ResolvedPairs>,
    ) -> PoolOutcome {
        let permits = Arc::new(Semaphore::new(self.workers));
        let mut tasks = JoinSet::new();
        let mut names: HashMap<tokio::task::Id, String> = HashMap::new();

        info!(
            partitions = partitions.len(),
            candidates = candidates.len(),
            workers = self.workers,
            "Starting evaluation"
        );

        for partition in partitions {
            let name = partition.name.clone();
            let permits = Arc::clone(&permits);
            let scorer = Arc::clone(&scorer);
            let candidates = Arc::clone(&candidates);
            let resolved = Arc::clone(&resolved);

            let handle = tasks.spawn(async move {
                let _permit = permits
                    .acquire_owned()
                    .await
                    .map_err(|e| format!("worker pool closed: {}", e))?;
                tokio::task::spawn_blocking(move || {
                    evaluate_partition(scorer.as_ref(), &partition, &candidates, &resolved)
                })
                .await
                .map_err(describe_join_error)
            });
            names.insert(handle.id(), name);
        }

        let mut outcome = PoolOutcome::default();
        let mut results = Vec::new();

        while let Some(joined) = tasks.join_next_with_id().await {
            let (id, reason) = match joined {
                Ok((_, Ok(result))) => {
                    results.push(result);
                    continue;
                }
                Ok((id, Err(reason))) => (id, reason),
                Err(join_error) => (join_error.id(), describe_join_error(join_error)),
            };
            let partition = names
                .get(&id)
                .cloned()
                .unwrap_or_else(|| format!("task-{}", id));
            error!(partition = %partition, reason = %reason, "Partition failed");
            outcome.failures.push(PartitionFailure { partition, reason });
        }

        for result in results {
            if result.failed_entirely() {
                error!(
                    partition = %result.partition,
                    unscored = result.unscored,
                    "Every pair in partition is unscored"
                );
                outcome.failures.push(PartitionFailure {
                    partition: result.partition.clone(),
                    reason: format!("all {} pairs unscored", result.unscored),
                });
            } else {
                outcome.completed.push(result.partition.clone());
            }
            outcome.table.merge(result.table);
        }

        outcome.completed.sort();
        outcome.failures.sort_by(|a, b| a.partition.cmp(&b.partition));

        info!(
            completed = outcome.completed.len(),
            failed = outcome.failures.len(),
            origins = outcome.table.len(),
            pairs = outcome.table.pair_count(),
            "Evaluation completed"
        );

        outcome
    }
}

fn describe_join_error(error: JoinError) -> String {
    if error.is_cancelled() {
        return "worker cancelled".to_string();
    }
    match error.try_into_panic() {
        Ok(payload) => format!("worker panicked: {}", panic_message(payload.as_ref())),
        Err(other) => other.to_string(),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic payload")
}
