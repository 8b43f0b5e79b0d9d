use std::collections::{BTreeMap, HashSet};

use super::domain::{
    Candidate, CandidateId, CandidateSubmission, Category, Position, PositionId,
    PositionSubmission,
};

pub const MERIT_MAX: f64 = 100.0;

/// Structural problems found in allocation input. Any of these aborts a run
/// before the ledger is built.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{record} is missing required field '{field}'")]
    MissingField { record: String, field: &'static str },
    #[error("{record} has unknown category '{value}' (expected GEN, SC, ST, OBC or EWS)")]
    UnknownCategory { record: String, value: String },
    #[error("{record} has merit {merit} outside 0..=100")]
    MeritOutOfRange { record: String, merit: f64 },
    #[error("{record} has negative {field} ({value})")]
    NegativeCount {
        record: String,
        field: String,
        value: i64,
    },
    #[error("{record} reserves {reserved} seats but only offers {total}")]
    ReservationsExceedSeats {
        record: String,
        reserved: u64,
        total: u32,
    },
    #[error("{record} count {value} does not fit in a seat counter")]
    CountOverflow { record: String, value: i64 },
    #[error("duplicate {kind} id '{id}'")]
    DuplicateId { kind: &'static str, id: String },
}

/// Converts raw submissions into domain records and re-checks whole rosters.
#[derive(Debug, Clone, Default)]
pub struct AllocationGuard;

impl AllocationGuard {
    /// Validate a candidate payload. `fallback_id` is used when the payload carries none.
    pub fn candidate_from_submission(
        &self,
        submission: CandidateSubmission,
        fallback_id: impl FnOnce() -> CandidateId,
    ) -> Result<Candidate, ValidationError> {
        let id = match submission.id.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => CandidateId(raw.to_string()),
            _ => fallback_id(),
        };
        let record = format!("candidate {id}");

        let name = required(&record, "name", submission.name)?;
        let skills = required(&record, "skills", submission.skills)?;
        let location_pref = required(&record, "location_pref", submission.location_pref)?;
        let sector_pref = required(&record, "sector_pref", submission.sector_pref)?;
        let category = parse_category(&record, &submission.category)?;
        check_merit(&record, submission.merit)?;

        Ok(Candidate {
            id,
            name,
            merit: submission.merit,
            skills,
            category,
            location_pref,
            sector_pref,
        })
    }

    /// Validate a position payload. `fallback_id` is used when the payload carries none.
    pub fn position_from_submission(
        &self,
        submission: PositionSubmission,
        fallback_id: impl FnOnce() -> PositionId,
    ) -> Result<Position, ValidationError> {
        let id = match submission.id.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => PositionId(raw.to_string()),
            _ => fallback_id(),
        };
        let record = format!("position {id}");

        let organization = required(&record, "organization", submission.organization)?;
        let role = required(&record, "role", submission.role)?;
        let required_skills = required(&record, "required_skills", submission.required_skills)?;
        let location = required(&record, "location", submission.location)?;
        let sector = required(&record, "sector", submission.sector)?;
        let total_seats = seat_count(&record, "total_seats", submission.total_seats)?;

        let mut reservations = BTreeMap::new();
        for (raw_category, count) in submission.reservations {
            let category = parse_category(&record, &raw_category)?;
            let seats = seat_count(&record, &format!("{} reservation", category), count)?;
            let slot = reservations.entry(category).or_insert(0u32);
            *slot = slot
                .checked_add(seats)
                .ok_or_else(|| ValidationError::CountOverflow {
                    record: record.clone(),
                    value: count,
                })?;
        }

        let position = Position {
            id,
            organization,
            role,
            required_skills,
            location,
            sector,
            total_seats,
            reservations,
        };
        check_reservations(&record, &position)?;

        Ok(position)
    }

    /// Re-check a roster of already-built records before a run touches any state.
    pub fn validate_roster(
        &self,
        candidates: &[Candidate],
        positions: &[Position],
    ) -> Result<(), ValidationError> {
        let mut seen = HashSet::new();
        for candidate in candidates {
            let record = format!("candidate {}", candidate.id);
            if candidate.id.0.trim().is_empty() {
                return Err(ValidationError::MissingField { record, field: "id" });
            }
            if !seen.insert(&candidate.id) {
                return Err(ValidationError::DuplicateId {
                    kind: "candidate",
                    id: candidate.id.0.clone(),
                });
            }
            present(&record, "name", &candidate.name)?;
            present(&record, "skills", &candidate.skills)?;
            present(&record, "location_pref", &candidate.location_pref)?;
            present(&record, "sector_pref", &candidate.sector_pref)?;
            check_merit(&record, candidate.merit)?;
        }

        let mut seen = HashSet::new();
        for position in positions {
            let record = format!("position {}", position.id);
            if position.id.0.trim().is_empty() {
                return Err(ValidationError::MissingField { record, field: "id" });
            }
            if !seen.insert(&position.id) {
                return Err(ValidationError::DuplicateId {
                    kind: "position",
                    id: position.id.0.clone(),
                });
            }
            present(&record, "organization", &position.organization)?;
            present(&record, "role", &position.role)?;
            present(&record, "required_skills", &position.required_skills)?;
            present(&record, "location", &position.location)?;
            present(&record, "sector", &position.sector)?;
            check_reservations(&record, position)?;
        }

        Ok(())
    }
}

fn required(record: &str, field: &'static str, value: String) -> Result<String, ValidationError> {
    present(record, field, &value)?;
    Ok(value.trim().to_string())
}

fn present(record: &str, field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField {
            record: record.to_string(),
            field,
        });
    }
    Ok(())
}

fn parse_category(record: &str, raw: &str) -> Result<Category, ValidationError> {
    raw.parse::<Category>()
        .map_err(|_| ValidationError::UnknownCategory {
            record: record.to_string(),
            value: raw.to_string(),
        })
}

fn check_merit(record: &str, merit: f64) -> Result<(), ValidationError> {
    if merit.is_finite() && (0.0..=MERIT_MAX).contains(&merit) {
        Ok(())
    } else {
        Err(ValidationError::MeritOutOfRange {
            record: record.to_string(),
            merit,
        })
    }
}

fn seat_count(record: &str, field: &str, value: i64) -> Result<u32, ValidationError> {
    if value < 0 {
        return Err(ValidationError::NegativeCount {
            record: record.to_string(),
            field: field.to_string(),
            value,
        });
    }
    u32::try_from(value).map_err(|_| ValidationError::CountOverflow {
        record: record.to_string(),
        value,
    })
}

fn check_reservations(record: &str, position: &Position) -> Result<(), ValidationError> {
    let reserved = position.reserved_total();
    if reserved > u64::from(position.total_seats) {
        return Err(ValidationError::ReservationsExceedSeats {
            record: record.to_string(),
            reserved,
            total: position.total_seats,
        });
    }
    Ok(())
}
