//! Shared builders for integration tests.

use std::sync::Arc;

use pasta::evaluation::WorkerPool;
use pasta::model::{PatchId, Version, VersionedStack};
use pasta::pipeline::{Pipeline, RunContext};
use pasta::scoring::{StaticScorer, Thresholds};

pub const TEST_WORKERS: usize = 2;

pub fn pid(id: &str) -> PatchId {
    PatchId::parse(id).expect("valid patch id")
}

pub fn stack(version: &str, patches: &[&str]) -> VersionedStack {
    VersionedStack::new(
        Version::parse(version).expect("valid version"),
        patches.iter().map(|p| pid(p)).collect(),
    )
}

/// One single-patch stack per version, `v1.0` holding the first id.
pub fn linear_history(ids: &[&str]) -> Vec<VersionedStack> {
    ids.iter()
        .enumerate()
        .map(|(minor, id)| stack(&format!("v1.{}", minor), &[id]))
        .collect()
}

pub fn pipeline_with(scorer: StaticScorer) -> Pipeline {
    Pipeline::new(
        RunContext::new(Thresholds::default(), Arc::new(scorer))
            .with_pool(WorkerPool::new(TEST_WORKERS)),
    )
}

/// Builder for a symmetric score table with a zero fallback.
#[derive(Default)]
pub struct ScoreTableBuilder {
    scores: Vec<(String, String, f64)>,
}

impl ScoreTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pair(mut self, a: &str, b: &str, score: f64) -> Self {
        self.scores.push((a.to_string(), b.to_string(), score));
        self
    }

    pub fn build(self) -> StaticScorer {
        self.scores
            .iter()
            .fold(StaticScorer::new().with_fallback(0.0), |scorer, (a, b, s)| {
                scorer.with_score(&pid(a), &pid(b), *s)
            })
    }

    /// Renders the table in the `origin candidate score` text format.
    pub fn to_table_text(&self) -> String {
        self.scores
            .iter()
            .map(|(a, b, s)| format!("{} {} {}\n", a, b, s))
            .collect()
    }
}
