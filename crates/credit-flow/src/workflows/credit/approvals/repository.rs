use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{ApprovalRequest, ApprovalRequestId, SignatoryId};
use crate::workflows::credit::assessment::AssessmentOutcome;
use crate::workflows::credit::intake::ApplicationProfile;

/// Repository record pairing the approval request with the profile it was
/// raised for and the latest assessment, when one has run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalRecord {
    pub request: ApprovalRequest,
    pub profile: ApplicationProfile,
    pub assessment: Option<AssessmentOutcome>,
}

impl ApprovalRecord {
    pub fn decision_rationale(&self) -> String {
        match &self.assessment {
            Some(outcome) => outcome.decision.summary(),
            None => "awaiting credit assessment".to_string(),
        }
    }

    pub fn status_view(&self) -> ApprovalStatusView {
        ApprovalStatusView {
            request_id: self.request.id.clone(),
            status: self.request.status.label(),
            amount: self.request.amount,
            required_quorum: self.request.required_quorum,
            approvals_recorded: self.request.approvals.len() as u32,
            expires_at: self.request.expires_at,
            decision_rationale: self.decision_rationale(),
            total_score: self.assessment.as_ref().map(|outcome| outcome.total_score),
        }
    }
}

/// Sanitized representation of a request's exposed status.
#[derive(Debug, Clone, Serialize)]
pub struct ApprovalStatusView {
    pub request_id: ApprovalRequestId,
    pub status: &'static str,
    pub amount: f64,
    pub required_quorum: u32,
    pub approvals_recorded: u32,
    pub expires_at: DateTime<Utc>,
    pub decision_rationale: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_score: Option<i16>,
}

/// Storage abstraction so the service module can be exercised in isolation.
/// Durable persistence lives behind this seam and is not part of the core.
pub trait ApprovalRepository: Send + Sync {
    fn insert(&self, record: ApprovalRecord) -> Result<ApprovalRecord, RepositoryError>;
    fn update(&self, record: ApprovalRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ApprovalRequestId) -> Result<Option<ApprovalRecord>, RepositoryError>;
    fn awaiting_signature(&self, limit: usize) -> Result<Vec<ApprovalRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Kind of outbound message sent to signatories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Info,
    SignatureRequest,
}

impl NoticeKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::SignatureRequest => "signature_request",
        }
    }
}

/// Payload handed to the notification boundary. Delivery is fire-and-forget;
/// the workflow never waits on a confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatoryNotice {
    pub kind: NoticeKind,
    pub request_id: ApprovalRequestId,
    pub recipients: Vec<SignatoryId>,
    pub details: BTreeMap<String, String>,
}

/// Trait describing outbound notification hooks (e.g., e-mail adapters).
pub trait SignatoryNotifier: Send + Sync {
    fn notify(&self, notice: SignatoryNotice) -> Result<(), NotifyError>;
}

/// Notification dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// Downstream hand-off invoked exactly once when a request is approved.
pub trait SubmissionGateway: Send + Sync {
    fn submit_approved(&self, request_id: &ApprovalRequestId) -> Result<(), SubmissionError>;
}

/// Downstream submission error.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("downstream submission failed: {0}")]
    Downstream(String),
}
