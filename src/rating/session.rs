use tracing::{debug, info, warn};

use crate::catalog::PatchCatalog;
use crate::model::{PatchId, ScorePair};
use crate::registry::{DecisionState, Resolution};
use crate::scoring::{Classification, Thresholds};

use super::checkpoint::Checkpoint;
use super::error::RatingResult;
use super::outcome::{PairOutcome, PairState, RatingOutcome, SkipReason};
use super::rater::{Rater, RatingPrompt, Verdict};

/// Single-threaded pass over scored pairs, highest score first.
///
/// Every human confirm/deny is checkpointed before the next pair is looked
/// at; automatic merges are checkpointed before the next prompt blocks, so an
/// interrupted session loses at most the decision in flight.
pub struct RatingSession<'a, R: ?Sized, C: ?Sized> {
    thresholds: Thresholds,
    rater: &'a mut R,
    checkpoint: &'a mut C,
    catalog: Option<&'a dyn PatchCatalog>,
}

impl<'a, R, C> RatingSession<'a, R, C>
where
    R: Rater + ?Sized,
    C: Checkpoint + ?Sized,
{
    pub fn new(thresholds: Thresholds, rater: &'a mut R, checkpoint: &'a mut C) -> Self {
        Self {
            thresholds,
            rater,
            checkpoint,
            catalog: None,
        }
    }

    pub fn with_catalog(mut self, catalog: &'a dyn PatchCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Processes `pairs` in the given order (callers pass them sorted by
    /// descending score) and mutates `state` as decisions are made.
    pub fn run(
        &mut self,
        state: &mut DecisionState,
        pairs: &[ScorePair],
    ) -> RatingResult<RatingOutcome> {
        let mut outcome = RatingOutcome::default();
        let mut unsaved = false;

        info!(pairs = pairs.len(), "Starting rating session");

        for (index, pair) in pairs.iter().enumerate() {
            let (a, b) = (&pair.origin, &pair.candidate);

            if let Some(resolution) = state.resolution(a, b) {
                let reason = match resolution {
                    Resolution::Related => SkipReason::AlreadyRelated,
                    Resolution::Rejected => SkipReason::AlreadyRejected,
                };
                debug!(origin = %a, candidate = %b, ?reason, "Pair already decided");
                outcome.push(PairOutcome {
                    pair: pair.clone(),
                    classification: None,
                    state: PairState::Skipped(reason),
                });
                continue;
            }

            let classification = self.thresholds.classify(pair.score);
            let pair_state = match classification {
                Classification::Reject => PairState::AutoRejected,
                _ if self.conflicts(state, pair) => {
                    PairState::Skipped(SkipReason::ConflictsWithRejection)
                }
                Classification::Accept => {
                    state.confirm(a, b)?;
                    unsaved = true;
                    PairState::AutoAccepted
                }
                Classification::Ask => {
                    if unsaved {
                        self.checkpoint.save(state)?;
                        unsaved = false;
                    }
                    let prompt = self.prompt(pair, index + 1, pairs.len());
                    match self.rater.rate(&prompt)? {
                        Verdict::Confirm => {
                            state.confirm(a, b)?;
                            self.checkpoint.save(state)?;
                            PairState::Confirmed
                        }
                        Verdict::Deny => {
                            state.deny(a, b)?;
                            self.checkpoint.save(state)?;
                            PairState::Denied
                        }
                        Verdict::Defer => PairState::Pending,
                    }
                }
            };

            debug!(
                origin = %a,
                candidate = %b,
                score = pair.score,
                classification = classification.debug_status(),
                state = %pair_state,
                "Pair rated"
            );
            outcome.push(PairOutcome {
                pair: pair.clone(),
                classification: Some(classification),
                state: pair_state,
            });
        }

        if unsaved {
            self.checkpoint.save(state)?;
        }

        let counts = &outcome.counts;
        info!(
            auto_accepted = counts.auto_accepted,
            auto_rejected = counts.auto_rejected,
            confirmed = counts.confirmed,
            denied = counts.denied,
            skipped = counts.skipped,
            pending = counts.pending,
            "Rating session finished"
        );

        Ok(outcome)
    }

    /// Whether merging the pair would relate a rejected pair. Such pairs are
    /// neither merged nor asked about.
    fn conflicts(&self, state: &DecisionState, pair: &ScorePair) -> bool {
        let Some(rejected) = state.would_conflict(&pair.origin, &pair.candidate) else {
            return false;
        };
        warn!(
            origin = %pair.origin,
            candidate = %pair.candidate,
            rejected = %rejected,
            "Not merging: would relate a rejected pair"
        );
        true
    }

    fn prompt(&self, pair: &ScorePair, position: usize, total: usize) -> RatingPrompt {
        let describe = |id: &PatchId| self.catalog.and_then(|catalog| catalog.describe(id));
        RatingPrompt {
            pair: pair.clone(),
            thresholds: self.thresholds,
            origin: describe(&pair.origin),
            candidate: describe(&pair.candidate),
            position,
            total,
        }
    }
}
