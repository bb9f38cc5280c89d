use std::sync::Arc;

use crate::catalog::PatchDetails;
use crate::model::ScorePair;
use crate::scoring::Thresholds;

use super::error::RatingResult;

/// A human (or scripted) answer to an ASK prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Confirm,
    Deny,
    Defer,
}

/// Everything shown for one ASK pair.
#[derive(Debug, Clone)]
pub struct RatingPrompt {
    pub pair: ScorePair,
    pub thresholds: Thresholds,
    pub origin: Option<Arc<PatchDetails>>,
    pub candidate: Option<Arc<PatchDetails>>,
    /// 1-based position among the pairs of this session.
    pub position: usize,
    pub total: usize,
}

pub trait Rater {
    fn rate(&mut self, prompt: &RatingPrompt) -> RatingResult<Verdict>;
}

impl<R: Rater + ?Sized> Rater for &mut R {
    fn rate(&mut self, prompt: &RatingPrompt) -> RatingResult<Verdict> {
        (**self).rate(prompt)
    }
}

impl<R: Rater + ?Sized> Rater for Box<R> {
    fn rate(&mut self, prompt: &RatingPrompt) -> RatingResult<Verdict> {
        (**self).rate(prompt)
    }
}

/// Defers every prompt; used for unattended runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeferAll;

impl Rater for DeferAll {
    fn rate(&mut self, _prompt: &RatingPrompt) -> RatingResult<Verdict> {
        Ok(Verdict::Defer)
    }
}
