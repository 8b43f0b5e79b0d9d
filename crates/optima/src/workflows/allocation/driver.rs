use std::cmp::Ordering;

use tracing::{debug, info};

use super::domain::{
    AllocationOutcome, AllocationSummary, Assignment, Candidate, NoMatchReason, Position,
    UnassignedCandidate,
};
use super::ledger::{LedgerError, QuotaLedger};
use super::scoring::{AllocationConfig, CompatibilityScorer, ScoreCard, WeightedScorer};
use super::validation::{AllocationGuard, ValidationError};

/// Errors that abort an allocation run. No assignments survive either kind.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AllocationError {
    #[error("invalid allocation input: {0}")]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Single-pass, merit-first allocator.
///
/// Candidates are visited once in descending merit order (input order breaks
/// ties). Each takes the highest scoring position that still has a seat in
/// their category, provided the score clears the configured threshold. There
/// is no backtracking or exchange step, so the result is greedy rather than
/// globally optimal.
pub struct AllocationDriver<S = WeightedScorer> {
    scorer: S,
    guard: AllocationGuard,
    min_score: f64,
}

impl AllocationDriver<WeightedScorer> {
    pub fn new(config: AllocationConfig) -> Self {
        Self::with_scorer(WeightedScorer::new(config.weights), config.min_score)
    }
}

impl Default for AllocationDriver<WeightedScorer> {
    fn default() -> Self {
        Self::new(AllocationConfig::default())
    }
}

struct BestMatch<'a> {
    position: &'a Position,
    card: ScoreCard,
}

impl<S: CompatibilityScorer> AllocationDriver<S> {
    pub fn with_scorer(scorer: S, min_score: f64) -> Self {
        Self {
            scorer,
            guard: AllocationGuard,
            min_score,
        }
    }

    /// Validate the roster, then run the pass against a fresh ledger.
    pub fn run(
        &self,
        candidates: &[Candidate],
        positions: &[Position],
    ) -> Result<AllocationOutcome, AllocationError> {
        self.guard.validate_roster(candidates, positions)?;

        info!(
            candidates = candidates.len(),
            positions = positions.len(),
            min_score = self.min_score,
            "starting allocation run"
        );

        let mut ledger = QuotaLedger::initialize(positions);
        let mut assignments = Vec::new();
        let mut unassigned = Vec::new();

        for candidate in merit_order(candidates) {
            match self.best_match(candidate, positions, &ledger) {
                None => {
                    debug!(
                        candidate = %candidate.id,
                        category = %candidate.category,
                        "no eligible position"
                    );
                    unassigned.push(UnassignedCandidate {
                        candidate_id: candidate.id.clone(),
                        reason: NoMatchReason::NoEligiblePosition,
                    });
                }
                Some(best) if best.card.total > self.min_score => {
                    let seats_left = ledger.consume(&best.position.id, candidate.category)?;
                    debug!(
                        candidate = %candidate.id,
                        position = %best.position.id,
                        score = best.card.total,
                        seats_left,
                        "assigned"
                    );
                    assignments.push(Assignment {
                        candidate_id: candidate.id.clone(),
                        position_id: best.position.id.clone(),
                        score: round_score(best.card.total),
                        rationale: best.card.rationale(),
                    });
                }
                Some(best) => {
                    debug!(
                        candidate = %candidate.id,
                        best_score = best.card.total,
                        "best score below threshold"
                    );
                    unassigned.push(UnassignedCandidate {
                        candidate_id: candidate.id.clone(),
                        reason: NoMatchReason::BelowThreshold {
                            best_score: round_score(best.card.total),
                        },
                    });
                }
            }
        }

        let summary = AllocationSummary {
            candidates_processed: candidates.len(),
            candidates_assigned: assignments.len(),
            unassigned,
        };

        info!(
            processed = summary.candidates_processed,
            assigned = summary.candidates_assigned,
            "allocation run complete"
        );

        Ok(AllocationOutcome {
            assignments,
            summary,
        })
    }

    /// Highest scoring eligible position; the first one wins a tie.
    fn best_match<'a>(
        &self,
        candidate: &Candidate,
        positions: &'a [Position],
        ledger: &QuotaLedger,
    ) -> Option<BestMatch<'a>> {
        let mut best: Option<BestMatch<'a>> = None;

        for position in positions
            .iter()
            .filter(|position| ledger.has_room(&position.id, candidate.category))
        {
            let card = self.scorer.score(candidate, position);
            let better = best
                .as_ref()
                .map_or(true, |current| card.total > current.card.total);
            if better {
                best = Some(BestMatch { position, card });
            }
        }

        best
    }
}

/// Stable merit-descending order. Merit is validated finite before this runs.
fn merit_order(candidates: &[Candidate]) -> Vec<&Candidate> {
    let mut ordered: Vec<&Candidate> = candidates.iter().collect();
    ordered.sort_by(|left, right| {
        right
            .merit
            .partial_cmp(&left.merit)
            .unwrap_or(Ordering::Equal)
    });
    ordered
}

fn round_score(score: f64) -> f64 {
    (score * 100.0).round() / 100.0
}
