use serde::Serialize;

use super::domain::{Assignment, Candidate, CandidateId, Position, PositionId};

/// Storage abstraction for rosters and the latest run's assignments.
///
/// Implementations only need to be safe to share; the service serializes
/// allocation runs itself.
pub trait AllocationStore: Send + Sync {
    fn insert_candidate(&self, candidate: Candidate) -> Result<Candidate, StoreError>;
    fn insert_position(&self, position: Position) -> Result<Position, StoreError>;
    /// Candidates in registration order.
    fn candidates(&self) -> Result<Vec<Candidate>, StoreError>;
    /// Positions in registration order.
    fn positions(&self) -> Result<Vec<Position>, StoreError>;
    fn clear_assignments(&self) -> Result<(), StoreError>;
    fn save_assignments(&self, assignments: Vec<Assignment>) -> Result<(), StoreError>;
    fn assignments(&self) -> Result<Vec<Assignment>, StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Assignment joined with the display fields of its candidate and position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentView {
    pub candidate_id: CandidateId,
    pub candidate_name: String,
    pub position_id: PositionId,
    pub organization: String,
    pub role: String,
    pub sector: String,
    pub score: f64,
    pub rationale: String,
}

impl AssignmentView {
    /// `None` when either side of the assignment is no longer in the roster.
    pub fn join(
        assignment: &Assignment,
        candidates: &[Candidate],
        positions: &[Position],
    ) -> Option<Self> {
        let candidate = candidates
            .iter()
            .find(|candidate| candidate.id == assignment.candidate_id)?;
        let position = positions
            .iter()
            .find(|position| position.id == assignment.position_id)?;

        Some(Self {
            candidate_id: candidate.id.clone(),
            candidate_name: candidate.name.clone(),
            position_id: position.id.clone(),
            organization: position.organization.clone(),
            role: position.role.clone(),
            sector: position.sector.clone(),
            score: assignment.score,
            rationale: assignment.rationale.clone(),
        })
    }
}
