//! SME credit application workflows: quoting, intake, assessment, and
//! director approval.

pub mod approvals;
pub mod assessment;
pub mod intake;
pub mod quote;

#[cfg(test)]
mod tests;

pub use approvals::{
    approval_router, ApprovalRecord, ApprovalRequest, ApprovalRequestId, ApprovalServiceError,
    ApprovalStatus, ApprovalWorkflowConfig, DirectorApprovalService, SignaturePolicy, SignatoryId,
};
pub use assessment::{AssessmentConfig, AssessmentEngine, AssessmentOutcome, CreditDecision};
pub use intake::{
    ApplicationProfile, ApplicationSubmission, BusinessSnapshot, FinancialSnapshot, IntakeError,
    IntakeGuard,
};
pub use quote::{
    amortize, AmortizationError, CreditQuote, LoanItem, PaymentFrequency, PricingPolicy,
    ProductCategory, QuoteError, RepaymentSchedule,
};
