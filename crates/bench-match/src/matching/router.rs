use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use tracing::error;

use super::directory::CandidateDirectory;
use super::domain::{RequirementId, RequirementSubmission};
use super::repository::{RepositoryError, RequirementRepository};
use super::service::{MatchingService, MatchingServiceError, ShortlistRequest};

/// Router exposing requirement intake, shortlisting and the dashboard.
pub fn matching_router<R, D>(service: Arc<MatchingService<R, D>>) -> Router
where
    R: RequirementRepository + 'static,
    D: CandidateDirectory + 'static,
{
    Router::new()
        .route("/api/v1/requirements", post(submit_handler::<R, D>))
        .route(
            "/api/v1/requirements/:requirement_id",
            get(status_handler::<R, D>),
        )
        .route(
            "/api/v1/requirements/:requirement_id/shortlist",
            post(shortlist_handler::<R, D>),
        )
        .route("/api/v1/dashboard", get(dashboard_handler::<R, D>))
        .with_state(service)
}

pub(crate) async fn submit_handler<R, D>(
    State(service): State<Arc<MatchingService<R, D>>>,
    axum::Json(submission): axum::Json<RequirementSubmission>,
) -> Response
where
    R: RequirementRepository + 'static,
    D: CandidateDirectory + 'static,
{
    match service.submit(submission) {
        Ok(record) => (StatusCode::ACCEPTED, axum::Json(record.status_view())).into_response(),
        Err(MatchingServiceError::Repository(RepositoryError::Conflict)) => error_response(
            StatusCode::CONFLICT,
            "requirement already exists".to_string(),
        ),
        Err(other) => service_error_response(other),
    }
}

pub(crate) async fn status_handler<R, D>(
    State(service): State<Arc<MatchingService<R, D>>>,
    Path(requirement_id): Path<String>,
) -> Response
where
    R: RequirementRepository + 'static,
    D: CandidateDirectory + 'static,
{
    let id = RequirementId(requirement_id);
    match service.get(&id) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(MatchingServiceError::Repository(RepositoryError::NotFound)) => not_found(&id),
        Err(other) => service_error_response(other),
    }
}

/// Ranking is CPU-bound, so it runs on the blocking pool. An empty body means
/// default options.
pub(crate) async fn shortlist_handler<R, D>(
    State(service): State<Arc<MatchingService<R, D>>>,
    Path(requirement_id): Path<String>,
    body: Bytes,
) -> Response
where
    R: RequirementRepository + 'static,
    D: CandidateDirectory + 'static,
{
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        ShortlistRequest::default()
    } else {
        match serde_json::from_slice::<ShortlistRequest>(&body) {
            Ok(request) => request,
            Err(err) => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    format!("invalid shortlist request: {err}"),
                )
            }
        }
    };

    let id = RequirementId(requirement_id);
    let task_id = id.clone();
    let outcome =
        tokio::task::spawn_blocking(move || service.shortlist(&task_id, request)).await;

    match outcome {
        Ok(Ok(shortlist)) => (StatusCode::OK, axum::Json(shortlist)).into_response(),
        Ok(Err(MatchingServiceError::Repository(RepositoryError::NotFound))) => not_found(&id),
        Ok(Err(other)) => service_error_response(other),
        Err(join_error) => {
            error!(requirement_id = %id, error = %join_error, "shortlist task failed");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "shortlist task failed".to_string(),
            )
        }
    }
}

pub(crate) async fn dashboard_handler<R, D>(
    State(service): State<Arc<MatchingService<R, D>>>,
) -> Response
where
    R: RequirementRepository + 'static,
    D: CandidateDirectory + 'static,
{
    match service.dashboard() {
        Ok(snapshot) => (StatusCode::OK, axum::Json(snapshot)).into_response(),
        Err(other) => service_error_response(other),
    }
}

fn not_found(id: &RequirementId) -> Response {
    let payload = json!({
        "requirement_id": id.0,
        "error": "requirement not found",
    });
    (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
}

fn service_error_response(err: MatchingServiceError) -> Response {
    let status = if err.is_invalid_requirement() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        error!(error = %err, "matching request failed");
        StatusCode::INTERNAL_SERVER_ERROR
    };
    error_response(status, err.to_string())
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, axum::Json(json!({ "error": message }))).into_response()
}
