use serde::{Deserialize, Serialize};

/// Point weights for each term of the compatibility score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub location: f64,
    pub sector: f64,
    pub skills: f64,
    pub merit: f64,
    /// Merit value that earns the full merit weight.
    pub merit_max: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            location: 30.0,
            sector: 25.0,
            skills: 35.0,
            merit: 10.0,
            merit_max: 100.0,
        }
    }
}

/// Rubric plus acceptance threshold used by an allocation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationConfig {
    pub weights: ScoringWeights,
    /// Best score must be strictly greater than this for a seat to be committed.
    pub min_score: f64,
}

impl AllocationConfig {
    pub const DEFAULT_MIN_SCORE: f64 = 20.0;
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            min_score: Self::DEFAULT_MIN_SCORE,
        }
    }
}
