mod config;
mod rules;

pub use config::{AllocationConfig, ScoringWeights};

use super::domain::{Candidate, Position};
use serde::{Deserialize, Serialize};

/// Seam between the driver and the matching rule. Implementations must be
/// deterministic and free of side effects.
pub trait CompatibilityScorer {
    fn score(&self, candidate: &Candidate, position: &Position) -> ScoreCard;
}

/// Additive scorer using substring matching on location, sector and skills plus a merit bonus.
#[derive(Debug, Clone, Default)]
pub struct WeightedScorer {
    weights: ScoringWeights,
}

impl WeightedScorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }
}

impl CompatibilityScorer for WeightedScorer {
    fn score(&self, candidate: &Candidate, position: &Position) -> ScoreCard {
        ScoreCard::from_components(rules::score_terms(candidate, position, &self.weights))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreTerm {
    Location,
    Sector,
    Skills,
    Merit,
}

/// Discrete contribution to a score, kept for audit output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub term: ScoreTerm,
    pub points: f64,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreCard {
    pub total: f64,
    pub components: Vec<ScoreComponent>,
}

impl ScoreCard {
    pub fn from_components(components: Vec<ScoreComponent>) -> Self {
        let total = components.iter().map(|component| component.points).sum();
        Self { total, components }
    }

    /// Comma-joined fragments, e.g. `Location match, 2 skill matches, Merit: 87%`.
    pub fn rationale(&self) -> String {
        self.components
            .iter()
            .map(|component| component.note.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn points_for(&self, term: ScoreTerm) -> f64 {
        self.components
            .iter()
            .filter(|component| component.term == term)
            .map(|component| component.points)
            .sum()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    pub(crate) use super::rules::{fuzzy_contains, normalize_tags};
}
