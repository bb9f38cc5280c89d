use std::fmt;

use serde::Serialize;

use super::error::{ScoringError, ScoringResult};

/// Default "ask a human" cutoff. Unitless; tied to the scorer's output range.
pub const DEFAULT_ASK_THRESHOLD: f64 = 350.0;
/// Default auto-accept cutoff.
pub const DEFAULT_ACCEPT_THRESHOLD: f64 = 400.0;

/// Outcome of classifying a single score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Classification {
    /// `score < ask`.
    Reject,
    /// `ask <= score < accept`.
    Ask,
    /// `score >= accept`.
    Accept,
}

impl Classification {
    pub fn debug_status(&self) -> &'static str {
        match self {
            Classification::Reject => "REJECT",
            Classification::Ask => "ASK",
            Classification::Accept => "ACCEPT",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.debug_status())
    }
}

/// Two ordered cutoffs, `ask <= accept`.
///
/// Exact boundary values resolve to the higher bucket: `score == ask` asks and
/// `score == accept` accepts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Thresholds {
    ask: f64,
    accept: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            ask: DEFAULT_ASK_THRESHOLD,
            accept: DEFAULT_ACCEPT_THRESHOLD,
        }
    }
}

impl Thresholds {
    pub fn new(ask: f64, accept: f64) -> ScoringResult<Self> {
        if !ask.is_finite() || !accept.is_finite() {
            return Err(ScoringError::InvalidThresholds {
                reason: format!("thresholds must be finite (ask={}, accept={})", ask, accept),
            });
        }
        if ask > accept {
            return Err(ScoringError::InvalidThresholds {
                reason: format!("ask ({}) must not exceed accept ({})", ask, accept),
            });
        }
        Ok(Self { ask, accept })
    }

    pub fn ask(&self) -> f64 {
        self.ask
    }

    pub fn accept(&self) -> f64 {
        self.accept
    }

    #[inline]
    pub fn classify(&self, score: f64) -> Classification {
        classify(score, self.ask, self.accept)
    }
}

/// Maps a raw score to a [`Classification`]. Monotone in both cutoffs: raising
/// either can only move a fixed score from `Accept` towards `Reject`.
#[inline]
pub fn classify(score: f64, ask: f64, accept: f64) -> Classification {
    if score >= accept {
        Classification::Accept
    } else if score >= ask {
        Classification::Ask
    } else {
        Classification::Reject
    }
}
