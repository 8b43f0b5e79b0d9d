use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use super::domain::{
    AllocationSummary, Assignment, Candidate, CandidateId, CandidateSubmission, Position,
    PositionId, PositionSubmission,
};
use super::driver::{AllocationDriver, AllocationError};
use super::repository::{AllocationStore, AssignmentView, StoreError};
use super::scoring::AllocationConfig;
use super::validation::{AllocationGuard, ValidationError};

/// Service composing the validation guard, the store and the allocation driver.
pub struct AllocationService<R> {
    guard: AllocationGuard,
    store: Arc<R>,
    driver: AllocationDriver,
    run_lock: Mutex<()>,
}

static CANDIDATE_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static POSITION_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static RUN_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_candidate_id() -> CandidateId {
    let id = CANDIDATE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    CandidateId(format!("cand-{id:06}"))
}

fn next_position_id() -> PositionId {
    let id = POSITION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    PositionId(format!("pos-{id:06}"))
}

fn next_run_id() -> String {
    let id = RUN_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("run-{id:06}")
}

/// What a completed run reports back to callers.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub summary: AllocationSummary,
    pub assignments: Vec<Assignment>,
}

impl RunReport {
    pub fn message(&self) -> String {
        format!(
            "Successfully allocated {} of {} candidates",
            self.summary.candidates_assigned, self.summary.candidates_processed
        )
    }
}

impl<R> AllocationService<R>
where
    R: AllocationStore + 'static,
{
    pub fn new(store: Arc<R>, config: AllocationConfig) -> Self {
        Self {
            guard: AllocationGuard,
            store,
            driver: AllocationDriver::new(config),
            run_lock: Mutex::new(()),
        }
    }

    /// Validate and store a candidate, assigning an id when none was supplied.
    pub fn register_candidate(
        &self,
        submission: CandidateSubmission,
    ) -> Result<Candidate, AllocationServiceError> {
        let candidate = self
            .guard
            .candidate_from_submission(submission, next_candidate_id)?;
        let stored = self.store.insert_candidate(candidate)?;
        Ok(stored)
    }

    /// Validate and store a position, assigning an id when none was supplied.
    pub fn register_position(
        &self,
        submission: PositionSubmission,
    ) -> Result<Position, AllocationServiceError> {
        let position = self
            .guard
            .position_from_submission(submission, next_position_id)?;
        let stored = self.store.insert_position(position)?;
        Ok(stored)
    }

    pub fn candidates(&self) -> Result<Vec<Candidate>, AllocationServiceError> {
        Ok(self.store.candidates()?)
    }

    pub fn positions(&self) -> Result<Vec<Position>, AllocationServiceError> {
        Ok(self.store.positions()?)
    }

    pub fn assignments(&self) -> Result<Vec<Assignment>, AllocationServiceError> {
        Ok(self.store.assignments()?)
    }

    /// Latest assignments joined with candidate and position display fields.
    pub fn assignment_views(&self) -> Result<Vec<AssignmentView>, AllocationServiceError> {
        let candidates = self.store.candidates()?;
        let positions = self.store.positions()?;
        let views = self
            .store
            .assignments()?
            .iter()
            .filter_map(|assignment| AssignmentView::join(assignment, &candidates, &positions))
            .collect();
        Ok(views)
    }

    /// Replace the previous run's assignments with a fresh allocation.
    ///
    /// Runs are serialized. Prior assignments are cleared before the driver
    /// starts, so a failed run leaves the store with no assignments at all.
    pub fn run(&self) -> Result<RunReport, AllocationServiceError> {
        let _running = self
            .run_lock
            .lock()
            .map_err(|_| AllocationServiceError::RunLockPoisoned)?;

        let run_id = next_run_id();
        let started_at = Utc::now();

        self.store.clear_assignments()?;
        info!(%run_id, "cleared previous assignments");

        let candidates = self.store.candidates()?;
        let positions = self.store.positions()?;
        let outcome = self.driver.run(&candidates, &positions)?;

        self.store.save_assignments(outcome.assignments.clone())?;
        info!(
            %run_id,
            persisted = outcome.assignments.len(),
            "assignments persisted"
        );

        Ok(RunReport {
            run_id,
            started_at,
            finished_at: Utc::now(),
            summary: outcome.summary,
            assignments: outcome.assignments,
        })
    }
}

/// Error raised by the allocation service.
#[derive(Debug, thiserror::Error)]
pub enum AllocationServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Allocation(#[from] AllocationError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("a previous allocation run panicked; the run lock is poisoned")]
    RunLockPoisoned,
}
