use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use crate::workflows::allocation::domain::{
    Assignment, Candidate, CandidateId, CandidateSubmission, Category, Position, PositionId,
    PositionSubmission,
};
use crate::workflows::allocation::repository::{AllocationStore, StoreError};
use crate::workflows::allocation::scoring::AllocationConfig;
use crate::workflows::allocation::{allocation_router, AllocationService};

pub(super) fn candidate(id: &str, merit: f64, category: Category) -> Candidate {
    Candidate {
        id: CandidateId(id.to_string()),
        name: format!("Candidate {id}"),
        merit,
        skills: "python,sql".to_string(),
        category,
        location_pref: "Delhi".to_string(),
        sector_pref: "Tech".to_string(),
    }
}

pub(super) fn position(id: &str, reservations: &[(Category, u32)]) -> Position {
    let reserved: u32 = reservations.iter().map(|(_, seats)| seats).sum();
    Position {
        id: PositionId(id.to_string()),
        organization: format!("Org {id}"),
        role: "Software Intern".to_string(),
        required_skills: "python,react".to_string(),
        location: "Delhi".to_string(),
        sector: "Tech".to_string(),
        total_seats: reserved,
        reservations: reservations.iter().copied().collect(),
    }
}

/// Candidate X from the reference scenario: GEN, python/sql, Delhi, Tech, merit 90.
pub(super) fn scenario_candidate() -> Candidate {
    candidate("x", 90.0, Category::General)
}

/// Position P from the reference scenario: one GEN seat, no SC seats.
pub(super) fn scenario_position() -> Position {
    position("p", &[(Category::General, 1), (Category::ScheduledCaste, 0)])
}

pub(super) fn candidate_submission(id: Option<&str>) -> CandidateSubmission {
    CandidateSubmission {
        id: id.map(str::to_string),
        name: "Asha Rao".to_string(),
        merit: 88.0,
        skills: "python, sql".to_string(),
        category: "GEN".to_string(),
        location_pref: "Delhi".to_string(),
        sector_pref: "Tech".to_string(),
    }
}

pub(super) fn position_submission(id: Option<&str>) -> PositionSubmission {
    PositionSubmission {
        id: id.map(str::to_string),
        organization: "Acme Analytics".to_string(),
        role: "Data Intern".to_string(),
        required_skills: "python,react".to_string(),
        location: "New Delhi".to_string(),
        sector: "Tech".to_string(),
        total_seats: 3,
        reservations: BTreeMap::from([("GEN".to_string(), 2), ("SC".to_string(), 1)]),
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    candidates: Arc<Mutex<Vec<Candidate>>>,
    positions: Arc<Mutex<Vec<Position>>>,
    assignments: Arc<Mutex<Vec<Assignment>>>,
}

impl MemoryStore {
    /// Bypasses the conflict check so tests can stage rosters the guard must reject.
    pub(super) fn force_candidate(&self, candidate: Candidate) {
        self.candidates.lock().unwrap().push(candidate);
    }

    pub(super) fn seed_assignments(&self, assignments: Vec<Assignment>) {
        *self.assignments.lock().unwrap() = assignments;
    }
}

impl AllocationStore for MemoryStore {
    fn insert_candidate(&self, candidate: Candidate) -> Result<Candidate, StoreError> {
        let mut guard = self.candidates.lock().unwrap();
        if guard.iter().any(|existing| existing.id == candidate.id) {
            return Err(StoreError::Conflict);
        }
        guard.push(candidate.clone());
        Ok(candidate)
    }

    fn insert_position(&self, position: Position) -> Result<Position, StoreError> {
        let mut guard = self.positions.lock().unwrap();
        if guard.iter().any(|existing| existing.id == position.id) {
            return Err(StoreError::Conflict);
        }
        guard.push(position.clone());
        Ok(position)
    }

    fn candidates(&self) -> Result<Vec<Candidate>, StoreError> {
        Ok(self.candidates.lock().unwrap().clone())
    }

    fn positions(&self) -> Result<Vec<Position>, StoreError> {
        Ok(self.positions.lock().unwrap().clone())
    }

    fn clear_assignments(&self) -> Result<(), StoreError> {
        self.assignments.lock().unwrap().clear();
        Ok(())
    }

    fn save_assignments(&self, assignments: Vec<Assignment>) -> Result<(), StoreError> {
        self.assignments.lock().unwrap().extend(assignments);
        Ok(())
    }

    fn assignments(&self) -> Result<Vec<Assignment>, StoreError> {
        Ok(self.assignments.lock().unwrap().clone())
    }
}

pub(super) struct UnavailableStore;

impl AllocationStore for UnavailableStore {
    fn insert_candidate(&self, _candidate: Candidate) -> Result<Candidate, StoreError> {
        Err(StoreError::Unavailable("offline".to_string()))
    }

    fn insert_position(&self, _position: Position) -> Result<Position, StoreError> {
        Err(StoreError::Unavailable("offline".to_string()))
    }

    fn candidates(&self) -> Result<Vec<Candidate>, StoreError> {
        Err(StoreError::Unavailable("offline".to_string()))
    }

    fn positions(&self) -> Result<Vec<Position>, StoreError> {
        Err(StoreError::Unavailable("offline".to_string()))
    }

    fn clear_assignments(&self) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("offline".to_string()))
    }

    fn save_assignments(&self, _assignments: Vec<Assignment>) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("offline".to_string()))
    }

    fn assignments(&self) -> Result<Vec<Assignment>, StoreError> {
        Err(StoreError::Unavailable("offline".to_string()))
    }
}

pub(super) fn build_service() -> (Arc<AllocationService<MemoryStore>>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let service = Arc::new(AllocationService::new(
        store.clone(),
        AllocationConfig::default(),
    ));
    (service, store)
}

pub(super) fn router_with_service(service: Arc<AllocationService<MemoryStore>>) -> axum::Router {
    allocation_router(service)
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
