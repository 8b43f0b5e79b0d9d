use super::common::*;
use crate::workflows::allocation::domain::{Assignment, CandidateId, Category, PositionId};
use crate::workflows::allocation::repository::{AllocationStore, StoreError};
use crate::workflows::allocation::scoring::AllocationConfig;
use crate::workflows::allocation::validation::ValidationError;
use crate::workflows::allocation::{AllocationError, AllocationService, AllocationServiceError};
use std::sync::Arc;

fn stale_assignment() -> Assignment {
    Assignment {
        candidate_id: CandidateId("stale".to_string()),
        position_id: PositionId("stale".to_string()),
        score: 99.0,
        rationale: "previous run".to_string(),
    }
}

#[test]
fn register_assigns_sequential_ids_when_missing() {
    let (service, _) = build_service();

    let first = service
        .register_candidate(candidate_submission(None))
        .expect("registers");
    let second = service
        .register_candidate(candidate_submission(None))
        .expect("registers");

    assert!(first.id.0.starts_with("cand-"));
    assert!(second.id.0.starts_with("cand-"));
    assert_ne!(first.id, second.id);

    let position = service
        .register_position(position_submission(None))
        .expect("registers");
    assert!(position.id.0.starts_with("pos-"));
}

#[test]
fn register_rejects_duplicate_ids() {
    let (service, _) = build_service();
    service
        .register_candidate(candidate_submission(Some("s1")))
        .expect("first registration");

    match service.register_candidate(candidate_submission(Some("s1"))) {
        Err(AllocationServiceError::Store(StoreError::Conflict)) => {}
        other => panic!("expected conflict, got {other:?}"),
    }
}

#[test]
fn register_propagates_validation_errors() {
    let (service, store) = build_service();
    let mut submission = candidate_submission(Some("s1"));
    submission.category = "unknown".to_string();

    assert!(matches!(
        service.register_candidate(submission),
        Err(AllocationServiceError::Validation(
            ValidationError::UnknownCategory { .. }
        ))
    ));
    assert!(store.candidates().expect("store readable").is_empty());
}

#[test]
fn run_replaces_previous_assignments() {
    let (service, store) = build_service();
    store.seed_assignments(vec![stale_assignment()]);
    service
        .register_candidate(candidate_submission(Some("s1")))
        .expect("registers");
    service
        .register_position(position_submission(Some("p1")))
        .expect("registers");

    let report = service.run().expect("run succeeds");

    assert_eq!(report.summary.candidates_processed, 1);
    assert_eq!(report.summary.candidates_assigned, 1);
    assert_eq!(report.message(), "Successfully allocated 1 of 1 candidates");
    assert!(report.finished_at >= report.started_at);

    let stored = store.assignments().expect("store readable");
    assert_eq!(stored, report.assignments);
    assert_eq!(stored[0].candidate_id, CandidateId("s1".to_string()));
}

#[test]
fn rerun_produces_identical_assignments() {
    let (service, store) = build_service();
    service
        .register_candidate(candidate_submission(Some("s1")))
        .expect("registers");
    service
        .register_position(position_submission(Some("p1")))
        .expect("registers");

    let first = service.run().expect("first run");
    let second = service.run().expect("second run");

    assert_eq!(first.assignments, second.assignments);
    assert_ne!(first.run_id, second.run_id);
    assert_eq!(store.assignments().expect("store readable").len(), 1);
}

#[test]
fn failed_run_commits_nothing() {
    let (service, store) = build_service();
    store.seed_assignments(vec![stale_assignment()]);
    store.force_candidate(candidate("dup", 90.0, Category::General));
    store.force_candidate(candidate("dup", 80.0, Category::General));

    match service.run() {
        Err(AllocationServiceError::Allocation(AllocationError::Validation(
            ValidationError::DuplicateId { .. },
        ))) => {}
        other => panic!("expected validation failure, got {other:?}"),
    }

    assert!(store.assignments().expect("store readable").is_empty());
}

#[test]
fn assignment_views_join_display_fields() {
    let (service, _) = build_service();
    service
        .register_candidate(candidate_submission(Some("s1")))
        .expect("registers");
    service
        .register_position(position_submission(Some("p1")))
        .expect("registers");
    service.run().expect("run succeeds");

    let views = service.assignment_views().expect("views");

    assert_eq!(views.len(), 1);
    assert_eq!(views[0].candidate_name, "Asha Rao");
    assert_eq!(views[0].organization, "Acme Analytics");
    assert_eq!(views[0].role, "Data Intern");
    assert_eq!(views[0].sector, "Tech");
}

#[test]
fn store_failures_surface_from_run() {
    let service = AllocationService::new(Arc::new(UnavailableStore), AllocationConfig::default());

    assert!(matches!(
        service.run(),
        Err(AllocationServiceError::Store(StoreError::Unavailable(_)))
    ));
}
