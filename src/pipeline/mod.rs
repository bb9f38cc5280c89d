//! One run: evaluate in parallel, then rate sequentially.

mod context;
mod error;
mod report;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use tracing::{debug, info};

use crate::evaluation::{EvaluationPlan, PoolOutcome};
use crate::model::{VersionRange, VersionedStack};
use crate::rating::{Checkpoint, Rater, RatingOutcome, RatingSession};
use crate::registry::DecisionState;

pub use context::RunContext;
pub use error::{PipelineError, PipelineResult};
pub use report::{
    EXIT_FATAL, EXIT_PARTITIONS_FAILED, EXIT_SUCCESS, RunReport, UnscoredPair,
};

/// Merged scoring results plus what was scored.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub range: VersionRange,
    pub partitions: Vec<String>,
    pub origins: usize,
    pub candidates: usize,
    pub outcome: PoolOutcome,
}

#[derive(Debug, Clone)]
pub struct Pipeline {
    context: RunContext,
}

impl Pipeline {
    pub fn new(context: RunContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &RunContext {
        &self.context
    }

    /// Scores every in-range origin against all candidates. Pairs already
    /// decided in `state` are not scored.
    pub async fn evaluate(
        &self,
        stacks: &[VersionedStack],
        state: &DecisionState,
    ) -> PipelineResult<Evaluation> {
        let plan = EvaluationPlan::build(stacks, &self.context.range)?;
        let partitions = plan.partition_names();
        let origins = plan.origin_count();
        let candidates = plan.candidates.len();

        info!(
            range = %self.context.range,
            partitions = partitions.len(),
            origins,
            candidates,
            "Evaluation planned"
        );

        self.context.scorer.precache(&plan.candidates);
        self.context.catalog.precache(&plan.candidates);

        let outcome = self
            .context
            .pool
            .evaluate(
                Arc::clone(&self.context.scorer),
                plan.partitions,
                plan.candidates.into(),
                Arc::new(state.resolved_pairs()),
            )
            .await;

        debug!(
            cached_scores = self.context.scorer.cached_scores(),
            "Score cache after evaluation"
        );

        Ok(Evaluation {
            range: self.context.range.clone(),
            partitions,
            origins,
            candidates,
            outcome,
        })
    }

    /// Runs the rating loop over the evaluation's pairs, highest score first.
    pub fn rate<R, C>(
        &self,
        evaluation: &Evaluation,
        state: &mut DecisionState,
        rater: &mut R,
        checkpoint: &mut C,
    ) -> PipelineResult<RatingOutcome>
    where
        R: Rater + ?Sized,
        C: Checkpoint + ?Sized,
    {
        let pairs = evaluation.outcome.table.scored_pairs();
        let outcome = RatingSession::new(self.context.thresholds, rater, checkpoint)
            .with_catalog(self.context.catalog.as_ref())
            .run(state, &pairs)?;
        Ok(outcome)
    }
}
