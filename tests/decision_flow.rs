//! End-to-end decision flow through the public API.

mod common;

use chrono::Utc;
use pasta::pipeline::{EXIT_PARTITIONS_FAILED, EXIT_SUCCESS, RunReport};
use pasta::rating::{MemoryCheckpoint, PairState, ScriptedRater, SkipReason, Verdict};
use pasta::registry::DecisionState;
use pasta::scoring::Thresholds;
use uuid::Uuid;

use common::fixtures::{ScoreTableBuilder, linear_history, pid, pipeline_with, stack};

#[tokio::test]
async fn test_transitive_accepts_skip_the_weak_pair() {
    let scorer = ScoreTableBuilder::new()
        .pair("A", "B", 410.0)
        .pair("B", "C", 405.0)
        .pair("A", "C", 120.0)
        .build();
    let pipeline = pipeline_with(scorer);
    let stacks = linear_history(&["A", "B", "C"]);

    let mut state = DecisionState::empty();
    let evaluation = pipeline.evaluate(&stacks, &state).await.unwrap();

    let mut rater = ScriptedRater::default();
    let mut checkpoint = MemoryCheckpoint::new();
    let rating = pipeline
        .rate(&evaluation, &mut state, &mut rater, &mut checkpoint)
        .unwrap();

    assert!(state.registry().are_related(&pid("A"), &pid("C")));
    assert_eq!(
        rating.state_of("A", "C"),
        Some(PairState::Skipped(SkipReason::AlreadyRelated))
    );
    assert!(rater.asked().is_empty());
    assert_eq!(checkpoint.save_count(), 1);
}

#[tokio::test]
async fn test_human_verdicts_shape_registry_and_rejections() {
    let scorer = ScoreTableBuilder::new()
        .pair("A", "B", 380.0)
        .pair("A", "C", 370.0)
        .build();
    let pipeline = pipeline_with(scorer);
    let stacks = linear_history(&["A", "B", "C"]);

    let mut state = DecisionState::empty();
    let evaluation = pipeline.evaluate(&stacks, &state).await.unwrap();

    let mut rater = ScriptedRater::new([Verdict::Confirm, Verdict::Deny]);
    let mut checkpoint = MemoryCheckpoint::new();
    let rating = pipeline
        .rate(&evaluation, &mut state, &mut rater, &mut checkpoint)
        .unwrap();

    assert_eq!(rating.state_of("A", "B"), Some(PairState::Confirmed));
    assert_eq!(rating.state_of("A", "C"), Some(PairState::Denied));
    assert!(state.registry().are_related(&pid("A"), &pid("B")));
    assert!(state.rejections().is_rejected(&pid("C"), &pid("A")));
    assert_eq!(rater.asked().len(), 2);
}

#[tokio::test]
async fn test_deferred_pair_is_pending_and_unrecorded() {
    let scorer = ScoreTableBuilder::new().pair("X", "Y", 360.0).build();
    let pipeline = pipeline_with(scorer);
    let stacks = vec![stack("v1.0", &["X"]), stack("v2.0", &["Y"])];

    let mut state = DecisionState::empty();
    let evaluation = pipeline.evaluate(&stacks, &state).await.unwrap();

    let mut rater = ScriptedRater::new([Verdict::Defer]);
    let mut checkpoint = MemoryCheckpoint::new();
    let rating = pipeline
        .rate(&evaluation, &mut state, &mut rater, &mut checkpoint)
        .unwrap();

    assert_eq!(rating.state_of("X", "Y"), Some(PairState::Pending));
    assert!(!state.registry().are_related(&pid("X"), &pid("Y")));
    assert!(state.rejections().is_empty());
}

#[tokio::test]
async fn test_crashed_partition_reports_failure_exit_code() {
    let scorer = ScoreTableBuilder::new()
        .pair("A", "B", 410.0)
        .build()
        .crashing_on(&pid("C"));
    let pipeline = pipeline_with(scorer);
    let stacks = linear_history(&["A", "B", "C"]);

    let mut state = DecisionState::empty();
    let evaluation = pipeline.evaluate(&stacks, &state).await.unwrap();
    assert_eq!(evaluation.outcome.failures.len(), 1);
    assert_eq!(evaluation.outcome.failures[0].partition, "v1.2");

    let mut rater = ScriptedRater::default();
    let mut checkpoint = MemoryCheckpoint::new();
    let rating = pipeline
        .rate(&evaluation, &mut state, &mut rater, &mut checkpoint)
        .unwrap();
    assert!(state.registry().are_related(&pid("A"), &pid("B")));

    let report = RunReport::new(
        Uuid::new_v4(),
        Utc::now(),
        Thresholds::default(),
        &evaluation,
        &rating,
    );
    assert!(!report.is_complete());
    assert_eq!(report.exit_code(), EXIT_PARTITIONS_FAILED);
}

#[tokio::test]
async fn test_clean_run_exits_successfully() {
    let pipeline = pipeline_with(ScoreTableBuilder::new().build());
    let stacks = linear_history(&["A", "B"]);

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

    assert_eq!(rating.counts.auto_rejected, 1);
    let report = RunReport::new(
        Uuid::new_v4(),
        Utc::now(),
        Thresholds::default(),
        &evaluation,
        &rating,
    );
    assert_eq!(report.exit_code(), EXIT_SUCCESS);
}
