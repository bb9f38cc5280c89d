use std::fmt;

use serde::Serialize;

use crate::model::ScorePair;
use crate::scoring::Classification;

/// Why a pair was not acted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    AlreadyRelated,
    AlreadyRejected,
    /// Merging would relate a pair a human already rejected.
    ConflictsWithRejection,
}

/// Final state of one pair after a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PairState {
    /// Deferred by the rater; asked again next run.
    Pending,
    Skipped(SkipReason),
    AutoAccepted,
    AutoRejected,
    Confirmed,
    Denied,
}

impl fmt::Display for PairState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PairState::Pending => f.write_str("PENDING"),
            PairState::Skipped(reason) => write!(f, "SKIPPED({:?})", reason),
            PairState::AutoAccepted => f.write_str("AUTO_ACCEPTED"),
            PairState::AutoRejected => f.write_str("AUTO_REJECTED"),
            PairState::Confirmed => f.write_str("CONFIRMED"),
            PairState::Denied => f.write_str("DENIED"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairOutcome {
    pub pair: ScorePair,
    /// `None` when the pair was skipped before classification.
    pub classification: Option<Classification>,
    pub state: PairState,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DecisionCounts {
    pub auto_accepted: usize,
    pub auto_rejected: usize,
    pub confirmed: usize,
    pub denied: usize,
    pub skipped: usize,
    pub pending: usize,
}

impl DecisionCounts {
    pub fn record(&mut self, state: PairState) {
        match state {
            PairState::Pending => self.pending += 1,
            PairState::Skipped(_) => self.skipped += 1,
            PairState::AutoAccepted => self.auto_accepted += 1,
            PairState::AutoRejected => self.auto_rejected += 1,
            PairState::Confirmed => self.confirmed += 1,
            PairState::Denied => self.denied += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.auto_accepted
            + self.auto_rejected
            + self.confirmed
            + self.denied
            + self.skipped
            + self.pending
    }
}

impl<'a> FromIterator<&'a PairOutcome> for DecisionCounts {
    fn from_iter<I: IntoIterator<Item = &'a PairOutcome>>(iter: I) -> Self {
        let mut counts = Self::default();
        for outcome in iter {
            counts.record(outcome.state);
        }
        counts
    }
}

/// Everything a session decided, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RatingOutcome {
    pub counts: DecisionCounts,
    pub pairs: Vec<PairOutcome>,
}

impl RatingOutcome {
    pub(crate) fn push(&mut self, outcome: PairOutcome) {
        self.counts.record(outcome.state);
        self.pairs.push(outcome);
    }

    pub fn state_of(&self, origin: &str, candidate: &str) -> Option<PairState> {
        self.pairs
            .iter()
            .find(|o| {
                let (a, b) = (o.pair.origin.as_str(), o.pair.candidate.as_str());
                (a == origin && b == candidate) || (a == candidate && b == origin)
            })
            .map(|o| o.state)
    }
}
