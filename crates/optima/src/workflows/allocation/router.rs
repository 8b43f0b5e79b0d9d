use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use tracing::error;

use super::domain::{CandidateSubmission, PositionSubmission};
use super::driver::AllocationError;
use super::repository::{AllocationStore, StoreError};
use super::service::{AllocationService, AllocationServiceError};

/// Router builder exposing roster intake, allocation runs and results.
pub fn allocation_router<R>(service: Arc<AllocationService<R>>) -> Router
where
    R: AllocationStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/candidates",
            post(register_candidate_handler::<R>).get(list_candidates_handler::<R>),
        )
        .route(
            "/api/v1/positions",
            post(register_position_handler::<R>).get(list_positions_handler::<R>),
        )
        .route("/api/v1/allocations/run", post(run_handler::<R>))
        .route("/api/v1/allocations", get(assignments_handler::<R>))
        .with_state(service)
}

pub(crate) async fn register_candidate_handler<R>(
    State(service): State<Arc<AllocationService<R>>>,
    axum::Json(submission): axum::Json<CandidateSubmission>,
) -> Response
where
    R: AllocationStore + 'static,
{
    match service.register_candidate(submission) {
        Ok(candidate) => (StatusCode::CREATED, axum::Json(candidate)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn list_candidates_handler<R>(
    State(service): State<Arc<AllocationService<R>>>,
) -> Response
where
    R: AllocationStore + 'static,
{
    match service.candidates() {
        Ok(candidates) => (StatusCode::OK, axum::Json(candidates)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn register_position_handler<R>(
    State(service): State<Arc<AllocationService<R>>>,
    axum::Json(submission): axum::Json<PositionSubmission>,
) -> Response
where
    R: AllocationStore + 'static,
{
    match service.register_position(submission) {
        Ok(position) => (StatusCode::CREATED, axum::Json(position)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn list_positions_handler<R>(
    State(service): State<Arc<AllocationService<R>>>,
) -> Response
where
    R: AllocationStore + 'static,
{
    match service.positions() {
        Ok(positions) => (StatusCode::OK, axum::Json(positions)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn run_handler<R>(State(service): State<Arc<AllocationService<R>>>) -> Response
where
    R: AllocationStore + 'static,
{
    // Runs hold a std mutex for the whole pass, so keep them off the async workers.
    let outcome = tokio::task::spawn_blocking(move || service.run()).await;
    match outcome {
        Err(join_error) => {
            error!(error = %join_error, "allocation run task failed");
            let payload = json!({
                "success": false,
                "error": "allocation run was interrupted",
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
        Ok(Ok(report)) => {
            let payload = json!({
                "success": true,
                "message": report.message(),
                "run_id": report.run_id,
                "allocations": report.summary.candidates_assigned,
                "summary": report.summary,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Ok(Err(err)) => error_response(err),
    }
}

pub(crate) async fn assignments_handler<R>(
    State(service): State<Arc<AllocationService<R>>>,
) -> Response
where
    R: AllocationStore + 'static,
{
    match service.assignment_views() {
        Ok(views) => (StatusCode::OK, axum::Json(views)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: AllocationServiceError) -> Response {
    let status = match &err {
        AllocationServiceError::Validation(_)
        | AllocationServiceError::Allocation(AllocationError::Validation(_)) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        AllocationServiceError::Store(StoreError::Conflict) => StatusCode::CONFLICT,
        AllocationServiceError::Allocation(AllocationError::Ledger(_))
        | AllocationServiceError::Store(StoreError::Unavailable(_))
        | AllocationServiceError::RunLockPoisoned => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({
        "success": false,
        "error": err.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
