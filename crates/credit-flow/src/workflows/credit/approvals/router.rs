use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ApprovalError, ApprovalRequestId, SignatoryId};
use super::repository::{ApprovalRepository, RepositoryError, SignatoryNotifier, SubmissionGateway};
use super::service::{ApprovalServiceError, DirectorApprovalService};
use crate::workflows::credit::intake::ApplicationSubmission;

/// Router builder exposing HTTP endpoints for intake, assessment, signing,
/// and status.
pub fn approval_router<R, N, G>(service: Arc<DirectorApprovalService<R, N, G>>) -> Router
where
    R: ApprovalRepository + 'static,
    N: SignatoryNotifier + 'static,
    G: SubmissionGateway + 'static,
{
    Router::new()
        .route("/api/v1/credit/applications", post(submit_handler::<R, N, G>))
        .route(
            "/api/v1/credit/applications/:request_id",
            get(status_handler::<R, N, G>),
        )
        .route(
            "/api/v1/credit/applications/:request_id/assessment",
            post(assess_handler::<R, N, G>),
        )
        .route(
            "/api/v1/credit/applications/:request_id/signatures",
            post(sign_handler::<R, N, G>),
        )
        .route(
            "/api/v1/credit/applications/:request_id/rejection",
            post(reject_handler::<R, N, G>),
        )
        .with_state(service)
}

/// Body accepted by the signature endpoint.
#[derive(Debug, Deserialize)]
pub struct SignatureRequestBody {
    pub signatory_id: String,
    pub signature_proof: String,
}

pub(crate) async fn submit_handler<R, N, G>(
    State(service): State<Arc<DirectorApprovalService<R, N, G>>>,
    axum::Json(submission): axum::Json<ApplicationSubmission>,
) -> Response
where
    R: ApprovalRepository + 'static,
    N: SignatoryNotifier + 'static,
    G: SubmissionGateway + 'static,
{
    match service.submit(submission) {
        Ok(record) => {
            let view = record.status_view();
            (StatusCode::ACCEPTED, axum::Json(view)).into_response()
        }
        Err(ApprovalServiceError::Intake(error)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(ApprovalServiceError::Repository(RepositoryError::Conflict)) => {
            let payload = json!({ "error": "application already exists" });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn status_handler<R, N, G>(
    State(service): State<Arc<DirectorApprovalService<R, N, G>>>,
    Path(request_id): Path<String>,
) -> Response
where
    R: ApprovalRepository + 'static,
    N: SignatoryNotifier + 'static,
    G: SubmissionGateway + 'static,
{
    let id = ApprovalRequestId(request_id);
    match service.get(&id) {
        Ok(record) => {
            let view = record.status_view();
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(err) => error_response(&id, err),
    }
}

pub(crate) async fn assess_handler<R, N, G>(
    State(service): State<Arc<DirectorApprovalService<R, N, G>>>,
    Path(request_id): Path<String>,
) -> Response
where
    R: ApprovalRepository + 'static,
    N: SignatoryNotifier + 'static,
    G: SubmissionGateway + 'static,
{
    let id = ApprovalRequestId(request_id);
    match service.assess(&id) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(err) => error_response(&id, err),
    }
}

pub(crate) async fn sign_handler<R, N, G>(
    State(service): State<Arc<DirectorApprovalService<R, N, G>>>,
    Path(request_id): Path<String>,
    axum::Json(body): axum::Json<SignatureRequestBody>,
) -> Response
where
    R: ApprovalRepository + 'static,
    N: SignatoryNotifier + 'static,
    G: SubmissionGateway + 'static,
{
    let id = ApprovalRequestId(request_id);
    match service.record_signature(&id, SignatoryId(body.signatory_id), body.signature_proof) {
        Ok((outcome, record)) => {
            let payload = json!({
                "outcome": outcome.label(),
                "request": record.status_view(),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(&id, err),
    }
}

pub(crate) async fn reject_handler<R, N, G>(
    State(service): State<Arc<DirectorApprovalService<R, N, G>>>,
    Path(request_id): Path<String>,
) -> Response
where
    R: ApprovalRepository + 'static,
    N: SignatoryNotifier + 'static,
    G: SubmissionGateway + 'static,
{
    let id = ApprovalRequestId(request_id);
    match service.reject(&id) {
        Ok(record) => {
            let view = record.status_view();
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(err) => error_response(&id, err),
    }
}

fn error_response(id: &ApprovalRequestId, err: ApprovalServiceError) -> Response {
    match err {
        ApprovalServiceError::Repository(RepositoryError::NotFound) => {
            let payload = json!({
                "request_id": id.0,
                "error": "approval request not found",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        ApprovalServiceError::Approval(ApprovalError::AlreadyExpired { expired_at }) => {
            let payload = json!({
                "request_id": id.0,
                "error": format!("signing window closed at {expired_at}"),
            });
            (StatusCode::GONE, axum::Json(payload)).into_response()
        }
        ApprovalServiceError::Approval(ApprovalError::InvalidState { status }) => {
            let payload = json!({
                "request_id": id.0,
                "error": format!("request is {} and accepts no further changes", status.label()),
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        ApprovalServiceError::UnknownSignatory(signatory) => {
            let payload = json!({
                "request_id": id.0,
                "error": format!("signatory {signatory} is not on the authorized roster"),
            });
            (StatusCode::FORBIDDEN, axum::Json(payload)).into_response()
        }
        other => internal_error(other),
    }
}

fn internal_error(err: ApprovalServiceError) -> Response {
    let payload = json!({ "error": err.to_string() });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
