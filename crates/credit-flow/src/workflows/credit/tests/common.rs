use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{Duration, Utc};
use serde_json::Value;

use crate::workflows::credit::approvals::{
    ApprovalRecord, ApprovalRepository, ApprovalRequestId, ApprovalStatus,
    ApprovalWorkflowConfig, DirectorApprovalService, NotifyError, RepositoryError,
    SignaturePolicy, SignatoryId, SignatoryNotice, SignatoryNotifier, SubmissionError,
    SubmissionGateway,
};
use crate::workflows::credit::assessment::AssessmentConfig;
use crate::workflows::credit::intake::{
    ApplicationSubmission, BusinessSnapshot, FinancialSnapshot,
};
use crate::workflows::credit::quote::{
    LoanItem, PaymentFrequency, PricingPolicy, ProductCategory,
};
use crate::workflows::roster::SignatoryDirectory;

pub(super) fn loan_item(principal: f64) -> LoanItem {
    LoanItem {
        product: ProductCategory::WorkingCapital,
        principal,
        annual_rate_percent: 5.5,
        term_months: 36,
        frequency: PaymentFrequency::Monthly,
    }
}

pub(super) fn business() -> BusinessSnapshot {
    BusinessSnapshot {
        legal_name: "Glenside Joinery Ltd".to_string(),
        registration_number: "IE645912".to_string(),
        years_trading: 6,
    }
}

/// Strong single-director application: €100k request against healthy
/// financials; assesses to an approval.
pub(super) fn submission() -> ApplicationSubmission {
    ApplicationSubmission {
        business: business(),
        financials: FinancialSnapshot {
            annual_revenue: 480_000.0,
            annual_net_profit: 96_000.0,
            existing_annual_debt_service: 12_000.0,
        },
        requested_items: vec![loan_item(100_000.0)],
        submitter_id: SignatoryId("dir-aoife".to_string()),
    }
}

/// €600k request needing two signatures; financials scaled so the rubric
/// still approves.
pub(super) fn dual_quorum_submission() -> ApplicationSubmission {
    ApplicationSubmission {
        business: business(),
        financials: FinancialSnapshot {
            annual_revenue: 2_400_000.0,
            annual_net_profit: 480_000.0,
            existing_annual_debt_service: 12_000.0,
        },
        requested_items: vec![loan_item(600_000.0)],
        submitter_id: SignatoryId("dir-aoife".to_string()),
    }
}

pub(super) fn assessment_config() -> AssessmentConfig {
    AssessmentConfig {
        minimum_debt_service_cover: 1.25,
        referral_debt_service_cover: 1.5,
        minimum_years_trading: 2,
        maximum_principal_to_revenue: 1.0,
    }
}

pub(super) fn workflow_config() -> ApprovalWorkflowConfig {
    ApprovalWorkflowConfig {
        pricing: PricingPolicy::standard(),
        assessment: assessment_config(),
        signatures: SignaturePolicy::standard(),
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<ApprovalRequestId, ApprovalRecord>>>,
}

impl ApprovalRepository for MemoryRepository {
    fn insert(&self, record: ApprovalRecord) -> Result<ApprovalRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.request.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.request.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: ApprovalRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(record.request.id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &ApprovalRequestId) -> Result<Option<ApprovalRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn awaiting_signature(&self, _limit: usize) -> Result<Vec<ApprovalRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| {
                record.request.status == ApprovalStatus::CreditApprovedAwaitingSignature
            })
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifier {
    notices: Arc<Mutex<Vec<SignatoryNotice>>>,
}

impl MemoryNotifier {
    pub(super) fn notices(&self) -> Vec<SignatoryNotice> {
        self.notices.lock().expect("notifier mutex poisoned").clone()
    }
}

impl SignatoryNotifier for MemoryNotifier {
    fn notify(&self, notice: SignatoryNotice) -> Result<(), NotifyError> {
        self.notices
            .lock()
            .expect("notifier mutex poisoned")
            .push(notice);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryGateway {
    submissions: Arc<Mutex<Vec<ApprovalRequestId>>>,
}

impl MemoryGateway {
    pub(super) fn submissions(&self) -> Vec<ApprovalRequestId> {
        self.submissions
            .lock()
            .expect("gateway mutex poisoned")
            .clone()
    }
}

impl SubmissionGateway for MemoryGateway {
    fn submit_approved(&self, request_id: &ApprovalRequestId) -> Result<(), SubmissionError> {
        self.submissions
            .lock()
            .expect("gateway mutex poisoned")
            .push(request_id.clone());
        Ok(())
    }
}

pub(super) struct ConflictRepository;

impl ApprovalRepository for ConflictRepository {
    fn insert(&self, _record: ApprovalRecord) -> Result<ApprovalRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update(&self, _record: ApprovalRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch(&self, _id: &ApprovalRequestId) -> Result<Option<ApprovalRecord>, RepositoryError> {
        Ok(None)
    }

    fn awaiting_signature(&self, _limit: usize) -> Result<Vec<ApprovalRecord>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) type MemoryService =
    DirectorApprovalService<MemoryRepository, MemoryNotifier, MemoryGateway>;

pub(super) fn build_service() -> (
    MemoryService,
    Arc<MemoryRepository>,
    Arc<MemoryNotifier>,
    Arc<MemoryGateway>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let notifier = Arc::new(MemoryNotifier::default());
    let gateway = Arc::new(MemoryGateway::default());
    let service = DirectorApprovalService::new(
        repository.clone(),
        notifier.clone(),
        gateway.clone(),
        SignatoryDirectory::standard(),
        workflow_config(),
    );
    (service, repository, notifier, gateway)
}

/// Backdate a stored request so its signing window has already closed.
pub(super) fn force_expiry(repository: &MemoryRepository, id: &ApprovalRequestId) {
    let mut guard = repository
        .records
        .lock()
        .expect("repository mutex poisoned");
    let record = guard.get_mut(id).expect("record present");
    record.request.expires_at = Utc::now() - Duration::days(1);
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 64)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
