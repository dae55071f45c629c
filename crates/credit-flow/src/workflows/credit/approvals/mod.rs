//! Director multi-approval tracking: the amount-tiered signature mandate,
//! the request state machine, and the service wiring it to the repository,
//! notification, and downstream-submission boundaries.

pub mod domain;
mod policy;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{
    ApprovalError, ApprovalRequest, ApprovalRequestId, ApprovalStatus, DecisionOutcome,
    SignatoryApproval, SignatoryId, SignatureOutcome,
};
pub use policy::{ApprovalTier, SignaturePolicy};
pub use repository::{
    ApprovalRecord, ApprovalRepository, ApprovalStatusView, NoticeKind, NotifyError,
    RepositoryError, SignatoryNotice, SignatoryNotifier, SubmissionError, SubmissionGateway,
};
pub use router::{approval_router, SignatureRequestBody};
pub use service::{ApprovalServiceError, ApprovalWorkflowConfig, DirectorApprovalService};
