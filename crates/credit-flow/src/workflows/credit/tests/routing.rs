use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::workflows::credit::approvals::{approval_router, DirectorApprovalService};
use crate::workflows::roster::SignatoryDirectory;

fn build_router() -> (
    axum::Router,
    Arc<MemoryRepository>,
    Arc<MemoryGateway>,
    Arc<MemoryService>,
) {
    let (service, repository, _, gateway) = build_service();
    let service = Arc::new(service);
    (approval_router(service.clone()), repository, gateway, service)
}

fn post_json(uri: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(payload).expect("serialize")))
        .expect("request")
}

fn post_empty(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

#[tokio::test]
async fn submit_route_returns_tracking_view() {
    let (router, _, _, _) = build_router();
    let payload = serde_json::to_value(submission()).expect("serialize submission");

    let response = router
        .oneshot(post_json("/api/v1/credit/applications", &payload))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let body = read_json_body(response).await;
    assert!(body.get("request_id").is_some());
    assert_eq!(body.get("status"), Some(&json!("pending")));
    assert_eq!(body.get("required_quorum"), Some(&json!(1)));
}

#[tokio::test]
async fn submit_route_rejects_invalid_intake() {
    let (router, _, _, _) = build_router();
    let mut bad = submission();
    bad.requested_items.clear();
    let payload = serde_json::to_value(bad).expect("serialize submission");

    let response = router
        .oneshot(post_json("/api/v1/credit/applications", &payload))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn submit_handler_maps_conflicts() {
    let service = Arc::new(DirectorApprovalService::new(
        Arc::new(ConflictRepository),
        Arc::new(MemoryNotifier::default()),
        Arc::new(MemoryGateway::default()),
        SignatoryDirectory::standard(),
        workflow_config(),
    ));

    let response = crate::workflows::credit::approvals::router::submit_handler::<
        ConflictRepository,
        MemoryNotifier,
        MemoryGateway,
    >(State(service), axum::Json(submission()))
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn full_flow_finalizes_through_the_router() {
    let (router, _, gateway, _) = build_router();

    let payload = serde_json::to_value(submission()).expect("serialize submission");
    let response = router
        .clone()
        .oneshot(post_json("/api/v1/credit/applications", &payload))
        .await
        .expect("submit executes");
    let body = read_json_body(response).await;
    let request_id = body
        .get("request_id")
        .and_then(Value::as_str)
        .expect("request id present")
        .to_string();

    let response = router
        .clone()
        .oneshot(post_empty(&format!(
            "/api/v1/credit/applications/{request_id}/assessment"
        )))
        .await
        .expect("assessment executes");
    assert_eq!(response.status(), StatusCode::OK);

    let signature = json!({
        "signatory_id": "dir-aoife",
        "signature_proof": "qes-token-001",
    });
    let response = router
        .clone()
        .oneshot(post_json(
            &format!("/api/v1/credit/applications/{request_id}/signatures"),
            &signature,
        ))
        .await
        .expect("signature executes");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body.get("outcome"), Some(&json!("finalized")));
    assert_eq!(
        body.pointer("/request/status"),
        Some(&json!("approved")),
    );
    assert_eq!(gateway.submissions().len(), 1);

    let response = router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/api/v1/credit/applications/{request_id}"))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("status executes");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body.get("status"), Some(&json!("approved")));
}

#[tokio::test]
async fn unknown_requests_return_not_found() {
    let (router, _, _, _) = build_router();
    let response = router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/credit/applications/req-missing")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json_body(response).await;
    assert_eq!(body.get("request_id"), Some(&json!("req-missing")));
}

#[tokio::test]
async fn signatures_on_expired_requests_return_gone() {
    let (router, repository, _, service) = build_router();
    let record = service.submit(submission()).expect("submission succeeds");
    service.assess(&record.request.id).expect("assessment runs");
    force_expiry(&repository, &record.request.id);

    let signature = json!({
        "signatory_id": "dir-aoife",
        "signature_proof": "qes-token-001",
    });
    let response = router
        .oneshot(post_json(
            &format!(
                "/api/v1/credit/applications/{}/signatures",
                record.request.id.0
            ),
            &signature,
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::GONE);
}

#[tokio::test]
async fn unlisted_signatories_return_forbidden() {
    let (router, _, _, service) = build_router();
    let record = service.submit(submission()).expect("submission succeeds");

    let signature = json!({
        "signatory_id": "dir-imposter",
        "signature_proof": "qes-token-001",
    });
    let response = router
        .oneshot(post_json(
            &format!(
                "/api/v1/credit/applications/{}/signatures",
                record.request.id.0
            ),
            &signature,
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn rejection_route_closes_open_requests() {
    let (router, _, _, service) = build_router();
    let record = service.submit(submission()).expect("submission succeeds");

    let response = router
        .clone()
        .oneshot(post_empty(&format!(
            "/api/v1/credit/applications/{}/rejection",
            record.request.id.0
        )))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body.get("status"), Some(&json!("rejected")));

    // A second rejection hits the terminal-state guard.
    let response = router
        .oneshot(post_empty(&format!(
            "/api/v1/credit/applications/{}/rejection",
            record.request.id.0
        )))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CONFLICT);
}
