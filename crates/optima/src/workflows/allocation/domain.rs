use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier wrapper for registered candidates.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(pub String);

/// Identifier wrapper for internship positions.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositionId(pub String);

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for PositionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Protected categories with set-aside seats on each position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "GEN")]
    General,
    #[serde(rename = "SC")]
    ScheduledCaste,
    #[serde(rename = "ST")]
    ScheduledTribe,
    #[serde(rename = "OBC")]
    OtherBackwardClass,
    #[serde(rename = "EWS")]
    EconomicallyWeaker,
}

impl Category {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::General,
            Self::ScheduledCaste,
            Self::ScheduledTribe,
            Self::OtherBackwardClass,
            Self::EconomicallyWeaker,
        ]
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::General => "GEN",
            Self::ScheduledCaste => "SC",
            Self::ScheduledTribe => "ST",
            Self::OtherBackwardClass => "OBC",
            Self::EconomicallyWeaker => "EWS",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category '{0}' (expected GEN, SC, ST, OBC or EWS)")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        Self::ordered()
            .into_iter()
            .find(|category| category.code().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownCategory(raw.to_string()))
    }
}

/// Inbound candidate payload prior to validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSubmission {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub merit: f64,
    pub skills: String,
    pub category: String,
    pub location_pref: String,
    pub sector_pref: String,
}

/// Inbound position payload prior to validation. Counts are signed so negative
/// values can be reported rather than silently wrapped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionSubmission {
    #[serde(default)]
    pub id: Option<String>,
    pub organization: String,
    pub role: String,
    pub required_skills: String,
    pub location: String,
    pub sector: String,
    pub total_seats: i64,
    #[serde(default)]
    pub reservations: BTreeMap<String, i64>,
}

/// Validated applicant. Immutable for the duration of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    pub merit: f64,
    pub skills: String,
    pub category: Category,
    pub location_pref: String,
    pub sector_pref: String,
}

/// Validated internship offering with per-category reserved seats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub id: PositionId,
    pub organization: String,
    pub role: String,
    pub required_skills: String,
    pub location: String,
    pub sector: String,
    pub total_seats: u32,
    pub reservations: BTreeMap<Category, u32>,
}

impl Position {
    /// Seats set aside for `category`; categories without an entry have none.
    pub fn reserved_for(&self, category: Category) -> u32 {
        self.reservations.get(&category).copied().unwrap_or(0)
    }

    pub fn reserved_total(&self) -> u64 {
        self.reservations.values().map(|seats| u64::from(*seats)).sum()
    }
}

/// Binding of one candidate to one position produced by an allocation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub candidate_id: CandidateId,
    pub position_id: PositionId,
    pub score: f64,
    pub rationale: String,
}

/// Why a visited candidate left the run without a seat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NoMatchReason {
    NoEligiblePosition,
    BelowThreshold { best_score: f64 },
}

impl NoMatchReason {
    pub fn summary(&self) -> String {
        match self {
            NoMatchReason::NoEligiblePosition => {
                "no position has a remaining seat in this category".to_string()
            }
            NoMatchReason::BelowThreshold { best_score } => {
                format!("best score {best_score:.2} did not clear the threshold")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnassignedCandidate {
    pub candidate_id: CandidateId,
    pub reason: NoMatchReason,
}

/// Run-level counters returned alongside the assignment list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllocationSummary {
    pub candidates_processed: usize,
    pub candidates_assigned: usize,
    pub unassigned: Vec<UnassignedCandidate>,
}

/// Full result of one driver pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllocationOutcome {
    pub assignments: Vec<Assignment>,
    pub summary: AllocationSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parses_codes_case_insensitively() {
        assert_eq!("gen".parse::<Category>(), Ok(Category::General));
        assert_eq!(" OBC ".parse::<Category>(), Ok(Category::OtherBackwardClass));
        assert_eq!(
            "open".parse::<Category>(),
            Err(UnknownCategory("open".to_string()))
        );
    }

    #[test]
    fn category_serializes_as_code() {
        let json = serde_json::to_string(&Category::EconomicallyWeaker).expect("serializes");
        assert_eq!(json, "\"EWS\"");
    }

    #[test]
    fn missing_reservation_counts_as_zero() {
        let position = Position {
            id: PositionId("pos-1".to_string()),
            organization: "Acme".to_string(),
            role: "Intern".to_string(),
            required_skills: "rust".to_string(),
            location: "Pune".to_string(),
            sector: "Tech".to_string(),
            total_seats: 2,
            reservations: BTreeMap::from([(Category::General, 2)]),
        };

        assert_eq!(position.reserved_for(Category::General), 2);
        assert_eq!(position.reserved_for(Category::ScheduledTribe), 0);
        assert_eq!(position.reserved_total(), 2);
    }
}
