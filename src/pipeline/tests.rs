use std::fs;
use std::sync::Arc;

use chrono::Utc;
use tempfile::TempDir;
use uuid::Uuid;

use super::*;
use crate::config::Config;
use crate::evaluation::WorkerPool;
use crate::manifest::ManifestFile;
use crate::model::{PatchId, Version, VersionedStack};
use crate::rating::{MemoryCheckpoint, PairState, ScriptedRater, SkipReason, Verdict};
use crate::registry::DecisionState;
use crate::scoring::{StaticScorer, Thresholds};

fn pid(s: &str) -> PatchId {
    PatchId::parse(s).unwrap()
}

fn stack(version: &str, patches: &[&str]) -> VersionedStack {
    VersionedStack::new(
        Version::parse(version).unwrap(),
        patches.iter().map(|p| pid(p)).collect(),
    )
}

fn pipeline(scorer: StaticScorer) -> Pipeline {
    Pipeline::new(
        RunContext::new(Thresholds::default(), Arc::new(scorer)).with_pool(WorkerPool::new(2)),
    )
}

#[tokio::test]
async fn test_evaluate_and_rate_with_transitive_pruning() {
    let (a, b, c) = (pid("A"), pid("B"), pid("C"));
    let scorer = StaticScorer::new()
        .with_score(&a, &b, 410.0)
        .with_score(&b, &c, 405.0)
        .with_score(&a, &c, 120.0);
    let pipeline = pipeline(scorer);
    let stacks = vec![stack("v1.0", &["A"]), stack("v1.1", &["B"]), stack("v1.2", &["C"])];

    let mut state = DecisionState::empty();
    let evaluation = pipeline.evaluate(&stacks, &state).await.unwrap();
    assert_eq!(evaluation.partitions, vec!["v1.0", "v1.1", "v1.2"]);
    assert_eq!(evaluation.outcome.table.pair_count(), 6);

    let mut rater = ScriptedRater::default();
    let mut checkpoint = MemoryCheckpoint::new();
    let rating = pipeline
        .rate(&evaluation, &mut state, &mut rater, &mut checkpoint)
        .unwrap();

    assert_eq!(rating.counts.auto_accepted, 2);
    assert_eq!(rating.counts.skipped, 1);
    assert_eq!(rating.counts.auto_rejected, 0);
    assert_eq!(
        rating.state_of("A", "C"),
        Some(PairState::Skipped(SkipReason::AlreadyRelated))
    );

    let report = RunReport::new(
        Uuid::new_v4(),
        Utc::now(),
        Thresholds::default(),
        &evaluation,
        &rating,
    );
    assert_eq!(report.exit_code(), EXIT_SUCCESS);
    assert_eq!(report.scored_pairs, 6);
}

#[tokio::test]
async fn test_second_run_skips_decided_pairs_before_scoring() {
    let (x, y) = (pid("X"), pid("Y"));
    let stacks = vec![stack("v1.0", &["X"]), stack("v2.0", &["Y"])];
    let mut state = DecisionState::empty();

    let first = pipeline(StaticScorer::new().with_score(&x, &y, 375.0));
    let evaluation = first.evaluate(&stacks, &state).await.unwrap();
    let mut rater = ScriptedRater::new([Verdict::Deny]);
    first
        .rate(&evaluation, &mut state, &mut rater, &mut MemoryCheckpoint::new())
        .unwrap();
    assert!(state.rejections().is_rejected(&x, &y));

    let scorer = Arc::new(StaticScorer::new().with_score(&x, &y, 375.0));
    let second = Pipeline::new(RunContext::new(Thresholds::default(), scorer.clone()));
    let evaluation = second.evaluate(&stacks, &state).await.unwrap();
    assert_eq!(scorer.calls(), 0);

    let mut rater = ScriptedRater::default();
    let rating = second
        .rate(&evaluation, &mut state, &mut rater, &mut MemoryCheckpoint::new())
        .unwrap();
    assert_eq!(rating.counts.total(), 0);
    assert!(rater.asked().is_empty());
}

#[tokio::test]
async fn test_failed_partition_sets_exit_code() {
    let scorer = StaticScorer::new()
        .with_fallback(100.0)
        .crashing_on(&pid("boom"));
    let pipeline = pipeline(scorer);
    let stacks = vec![stack("v1.0", &["ok"]), stack("v1.1", &["boom"])];

    let mut state = DecisionState::empty();
    let evaluation = pipeline.evaluate(&stacks, &state).await.unwrap();
    let rating = pipeline
        .rate(
            &evaluation,
            &mut state,
            &mut ScriptedRater::default(),
            &mut MemoryCheckpoint::new(),
        )
        .unwrap();

    let report = RunReport::new(
        Uuid::new_v4(),
        Utc::now(),
        Thresholds::default(),
        &evaluation,
        &rating,
    );
    assert!(!report.is_complete());
    assert_eq!(report.exit_code(), EXIT_PARTITIONS_FAILED);
    assert_eq!(report.failed_partitions[0].partition, "v1.1");
    // the surviving partition was still rated
    assert_eq!(rating.counts.auto_rejected, 1);
}

#[tokio::test]
async fn test_unscored_pair_does_not_fail_the_run() {
    let scorer = StaticScorer::new()
        .with_fallback(100.0)
        .failing_on(&pid("a"), &pid("c"));
    let pipeline = pipeline(scorer);
    let stacks = vec![stack("v1.0", &["a"]), stack("v1.1", &["b", "c"])];

    let mut state = DecisionState::empty();
    let evaluation = pipeline.evaluate(&stacks, &state).await.unwrap();
    let rating = pipeline
        .rate(
            &evaluation,
            &mut state,
            &mut ScriptedRater::default(),
            &mut MemoryCheckpoint::new(),
        )
        .unwrap();
    let report = RunReport::new(
        Uuid::new_v4(),
        Utc::now(),
        Thresholds::default(),
        &evaluation,
        &rating,
    );

    assert_eq!(report.exit_code(), EXIT_SUCCESS);
    assert_eq!(
        report.unscored,
        vec![UnscoredPair {
            origin: "a".to_string(),
            candidate: "c".to_string(),
            reason: "scoring computation failed: injected failure for a -> c".to_string(),
        }]
    );
    // c -> a was still scored from the other partition
    assert_eq!(rating.counts.auto_rejected, 3);
}

#[tokio::test]
async fn test_evaluate_rejects_empty_range() {
    let pipeline = Pipeline::new(
        RunContext::new(Thresholds::default(), Arc::new(StaticScorer::new())).with_range(
            crate::model::VersionRange::new(Some(Version::parse("v9").unwrap()), None),
        ),
    );
    let result = pipeline
        .evaluate(&[stack("v1.0", &["a"])], &DecisionState::empty())
        .await;
    assert!(matches!(result, Err(PipelineError::Evaluation(_))));
}

#[test]
fn test_report_serializes_counts() {
    let evaluation = Evaluation {
        range: crate::model::VersionRange::unbounded(),
        partitions: vec!["v1.0".to_string()],
        origins: 1,
        candidates: 2,
        outcome: Default::default(),
    };
    let report = RunReport::new(
        Uuid::new_v4(),
        Utc::now(),
        Thresholds::default(),
        &evaluation,
        &Default::default(),
    );

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["version_range"], "[*, *]");
    assert_eq!(json["counts"]["auto_accepted"], 0);
    assert_eq!(json["thresholds"]["ask"], 350.0);
    assert!(json["run_id"].is_string());
}

#[test]
fn test_context_from_config() {
    let dir = TempDir::new().unwrap();
    let scores = dir.path().join("scores.txt");
    fs::write(&scores, "a b 390\n").unwrap();
    let manifest_path = dir.path().join("stacks.json");
    fs::write(&manifest_path, r#"{"stacks": [{"version": "v1", "patches": ["a", "b"]}]}"#)
        .unwrap();
    let manifest = ManifestFile::load(&manifest_path).unwrap();

    let config = Config {
        data_dir: dir.path().join("data"),
        manifest_path,
        scores_path: Some(scores),
        workers: 3,
        ..Default::default()
    };
    let context = RunContext::from_config(&config, &manifest).unwrap();
    assert_eq!(context.pool.workers(), 3);
    assert_eq!(context.scorer.cached_scores(), 0);
    assert_eq!(context.scorer.score(&pid("b"), &pid("a")).unwrap(), 390.0);
    assert_eq!(context.scorer.score(&pid("b"), &pid("a")).unwrap(), 390.0);
    assert_eq!(context.scorer.cached_scores(), 1);

    let missing = Config {
        scores_path: None,
        ..config
    };
    assert!(matches!(
        RunContext::from_config(&missing, &manifest),
        Err(PipelineError::Config(_))
    ));
}
