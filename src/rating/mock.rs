use std::collections::VecDeque;

use crate::model::PairKey;
use crate::registry::DecisionState;
use crate::storage::{StorageError, StorageResult};

use super::checkpoint::Checkpoint;
use super::error::{RatingError, RatingResult};
use super::rater::{Rater, RatingPrompt, Verdict};

/// Answers prompts from a fixed script and records what was asked.
#[derive(Debug, Default)]
pub struct ScriptedRater {
    verdicts: VecDeque<Verdict>,
    asked: Vec<PairKey>,
}

impl ScriptedRater {
    pub fn new(verdicts: impl IntoIterator<Item = Verdict>) -> Self {
        Self {
            verdicts: verdicts.into_iter().collect(),
            asked: Vec::new(),
        }
    }

    pub fn asked(&self) -> &[PairKey] {
        &self.asked
    }

    pub fn remaining(&self) -> usize {
        self.verdicts.len()
    }
}

impl Rater for ScriptedRater {
    fn rate(&mut self, prompt: &RatingPrompt) -> RatingResult<Verdict> {
        if let Ok(key) = prompt.pair.key() {
            self.asked.push(key);
        }
        self.verdicts
            .pop_front()
            .ok_or_else(|| RatingError::RaterUnavailable("script exhausted".to_string()))
    }
}

/// Keeps every saved state in memory; optionally fails from the n-th save on.
#[derive(Debug, Default)]
pub struct MemoryCheckpoint {
    saves: Vec<(Vec<PairKey>, Vec<PairKey>)>,
    fail_from: Option<usize>,
}

impl MemoryCheckpoint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_from(save_index: usize) -> Self {
        Self {
            saves: Vec::new(),
            fail_from: Some(save_index),
        }
    }

    pub fn save_count(&self) -> usize {
        self.saves.len()
    }

    /// `(related edges, rejected pairs)` of the last successful save.
    pub fn last(&self) -> Option<&(Vec<PairKey>, Vec<PairKey>)> {
        self.saves.last()
    }
}

impl Checkpoint for MemoryCheckpoint {
    fn save(&mut self, state: &DecisionState) -> StorageResult<()> {
        if self.fail_from.is_some_and(|n| self.saves.len() >= n) {
            return Err(StorageError::Io(std::io::Error::other("injected checkpoint failure")));
        }
        self.saves.push((
            state.registry().to_persisted_form().to_vec(),
            state.rejections().to_persisted_form().to_vec(),
        ));
        Ok(())
    }
}
