use metrics_exporter_prometheus::PrometheusHandle;
use optima::config;
use optima::workflows::allocation::{
    AllocationStore, Assignment, Candidate, Position, StoreError,
};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local store backing the HTTP service and the CLI demo.
#[derive(Default, Clone)]
pub(crate) struct InMemoryAllocationStore {
    candidates: Arc<Mutex<Vec<Candidate>>>,
    positions: Arc<Mutex<Vec<Position>>>,
    assignments: Arc<Mutex<Vec<Assignment>>>,
}

fn lock<'a, T>(mutex: &'a Mutex<T>, name: &str) -> Result<MutexGuard<'a, T>, StoreError> {
    mutex
        .lock()
        .map_err(|_| StoreError::Unavailable(format!("{name} mutex poisoned")))
}

impl AllocationStore for InMemoryAllocationStore {
    fn insert_candidate(&self, candidate: Candidate) -> Result<Candidate, StoreError> {
        let mut guard = lock(&self.candidates, "candidate")?;
        if guard.iter().any(|existing| existing.id == candidate.id) {
            return Err(StoreError::Conflict);
        }
        guard.push(candidate.clone());
        Ok(candidate)
    }

    fn insert_position(&self, position: Position) -> Result<Position, StoreError> {
        let mut guard = lock(&self.positions, "position")?;
        if guard.iter().any(|existing| existing.id == position.id) {
            return Err(StoreError::Conflict);
        }
        guard.push(position.clone());
        Ok(position)
    }

    fn candidates(&self) -> Result<Vec<Candidate>, StoreError> {
        Ok(lock(&self.candidates, "candidate")?.clone())
    }

    fn positions(&self) -> Result<Vec<Position>, StoreError> {
        Ok(lock(&self.positions, "position")?.clone())
    }

    fn clear_assignments(&self) -> Result<(), StoreError> {
        lock(&self.assignments, "assignment")?.clear();
        Ok(())
    }

    fn save_assignments(&self, assignments: Vec<Assignment>) -> Result<(), StoreError> {
        lock(&self.assignments, "assignment")?.extend(assignments);
        Ok(())
    }

    fn assignments(&self) -> Result<Vec<Assignment>, StoreError> {
        Ok(lock(&self.assignments, "assignment")?.clone())
    }
}

pub(crate) fn parse_min_score(raw: &str) -> Result<f64, String> {
    config::parse_min_score(raw).map_err(|err| err.to_string())
}
