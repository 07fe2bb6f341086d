use super::common::*;
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::matching::{matching_router, MatchingService, ScoringConfig};

fn router() -> axum::Router {
    let (service, _, _) = build_service();
    matching_router(Arc::new(service))
}

fn json_request(method: &str, uri: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(payload).expect("serializable")))
        .expect("request builds")
}

async fn submit(router: &axum::Router) -> String {
    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/requirements",
            &json!(cloud_submission()),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let payload = read_json_body(response).await;
    payload["requirement_id"]
        .as_str()
        .expect("id present")
        .to_string()
}

#[tokio::test]
async fn submit_route_accepts_comma_delimited_certifications() {
    let router = router();
    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/requirements",
            &json!({
                "client_name": "Northwind",
                "role_title": "Cloud Engineer",
                "required_skills": ["AWS", "Terraform"],
                "minimum_experience": 2,
                "mandatory_certifications": "AWS Solutions Architect, CKA",
                "availability_date": "2025-04-01"
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["status"], "In Progress");
    assert_eq!(payload["role_title"], "Cloud Engineer");
    assert!(payload.get("top_candidate_fit_score").is_none());
}

#[tokio::test]
async fn submit_handler_returns_unprocessable_for_invalid_requirement() {
    let (service, _, _) = build_service();
    let mut submission = cloud_submission();
    submission.required_skills.clear();

    let response = crate::matching::router::submit_handler(
        State(Arc::new(service)),
        axum::Json(submission),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .expect("message")
        .contains("at least one required skill"));
}

#[tokio::test]
async fn submit_handler_returns_conflict_on_duplicate() {
    let service = Arc::new(MatchingService::new(
        Arc::new(ConflictRepository),
        Arc::new(seeded_directory()),
        ScoringConfig::default(),
    ));

    let response =
        crate::matching::router::submit_handler(State(service), axum::Json(cloud_submission()))
            .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn submit_handler_returns_internal_error_on_repository_failure() {
    let service = Arc::new(MatchingService::new(
        Arc::new(UnavailableRepository),
        Arc::new(seeded_directory()),
        ScoringConfig::default(),
    ));

    let response =
        crate::matching::router::submit_handler(State(service), axum::Json(cloud_submission()))
            .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn status_route_reports_unknown_requirements_as_not_found() {
    let response = router()
        .oneshot(
            Request::get("/api/v1/requirements/req-404")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert_eq!(payload["requirement_id"], "req-404");
}

#[tokio::test]
async fn shortlist_route_ranks_with_empty_body() {
    let router = router();
    let id = submit(&router).await;

    let response = router
        .clone()
        .oneshot(
            Request::post(format!("/api/v1/requirements/{id}/shortlist"))
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["requirement_id"], id.as_str());
    assert_eq!(payload["entries"][0]["candidate_id"], "cand-a");
    assert_eq!(payload["entries"][0]["overall_fit"], 96);
    assert_eq!(payload["excluded"][0]["candidate_id"], "cand-b");

    let status = router
        .oneshot(
            Request::get(format!("/api/v1/requirements/{id}"))
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    let payload = read_json_body(status).await;
    assert_eq!(payload["status"], "Matched");
    assert_eq!(payload["shortlisted"], 2);
    assert_eq!(payload["top_candidate_fit_score"], 96);
}

#[tokio::test]
async fn shortlist_route_honours_request_options() {
    let router = router();
    let id = submit(&router).await;

    let response = router
        .oneshot(json_request(
            "POST",
            &format!("/api/v1/requirements/{id}/shortlist"),
            &json!({ "top_n": 5, "eligibility": "bench_only" }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let entries = payload["entries"].as_array().expect("entries");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["bench_status"], "on_bench");
}

#[tokio::test]
async fn shortlist_route_rejects_malformed_options() {
    let router = router();
    let id = submit(&router).await;

    let response = router
        .oneshot(json_request(
            "POST",
            &format!("/api/v1/requirements/{id}/shortlist"),
            &json!({ "eligibility": "everyone" }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn shortlist_route_for_unknown_requirement_is_not_found() {
    let response = router()
        .oneshot(
            Request::post("/api/v1/requirements/req-missing/shortlist")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn dashboard_route_returns_snapshot() {
    let router = router();
    submit(&router).await;

    let response = router
        .oneshot(
            Request::get("/api/v1/dashboard")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["kpis"]["open_requirements"], 1);
    assert_eq!(payload["kpis"]["bench_headcount"], 2);
    assert_eq!(payload["bench"][1]["label"], "Partial");
    assert_eq!(payload["bench"][1]["count"], 1);
}
