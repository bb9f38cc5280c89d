//! Fan-out scoring of origin patches against the candidate pool.
//!
//! Origins are split into disjoint [`Partition`]s (one per release line); each
//! worker scores its partition against every candidate and returns its own
//! [`EvaluationTable`]. Because partitions never share an origin, merging the
//! partial tables is a plain key union.

mod error;
mod pool;
mod table;
mod worker;


pub use error::{EvaluationError, EvaluationResult};
pub use pool::{PartitionFailure, PoolOutcome, WorkerPool};
pub use table::{CandidateScore, EvaluationTable, ScoreOutcome};
pub use worker::{
    EvaluationPlan, Partition, PartitionResult, candidate_pool, evaluate_partition,
    partition_origins,
};
