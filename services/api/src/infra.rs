use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use credit_flow::error::AppError;
use credit_flow::workflows::credit::approvals::{
    ApprovalRecord, ApprovalRepository, ApprovalRequestId, ApprovalStatus, ApprovalWorkflowConfig,
    NotifyError, RepositoryError, SignaturePolicy, SignatoryNotice, SignatoryNotifier,
    SubmissionError, SubmissionGateway,
};
use credit_flow::workflows::credit::assessment::AssessmentConfig;
use credit_flow::workflows::credit::quote::{PaymentFrequency, PricingPolicy, ProductCategory};
use credit_flow::workflows::roster::{RosterImporter, SignatoryDirectory};
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryApprovalRepository {
    records: Arc<Mutex<HashMap<ApprovalRequestId, ApprovalRecord>>>,
}

impl ApprovalRepository for InMemoryApprovalRepository {
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
        if guard.contains_key(&record.request.id) {
            guard.insert(record.request.id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
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

/// Simulated e-mail adapter: notices are logged and retained so demos can
/// show what went out.
#[derive(Default, Clone)]
pub(crate) struct RecordingNotifier {
    notices: Arc<Mutex<Vec<SignatoryNotice>>>,
}

impl RecordingNotifier {
    pub(crate) fn notices(&self) -> Vec<SignatoryNotice> {
        self.notices.lock().expect("notifier mutex poisoned").clone()
    }
}

impl SignatoryNotifier for RecordingNotifier {
    fn notify(&self, notice: SignatoryNotice) -> Result<(), NotifyError> {
        info!(
            kind = notice.kind.label(),
            request = %notice.request_id.0,
            recipients = notice.recipients.len(),
            "dispatching signatory notice"
        );
        self.notices
            .lock()
            .expect("notifier mutex poisoned")
            .push(notice);
        Ok(())
    }
}

/// Stand-in for the downstream booking system.
#[derive(Default, Clone)]
pub(crate) struct RecordingGateway {
    submissions: Arc<Mutex<Vec<ApprovalRequestId>>>,
}

impl RecordingGateway {
    pub(crate) fn submissions(&self) -> Vec<ApprovalRequestId> {
        self.submissions
            .lock()
            .expect("gateway mutex poisoned")
            .clone()
    }
}

impl SubmissionGateway for RecordingGateway {
    fn submit_approved(&self, request_id: &ApprovalRequestId) -> Result<(), SubmissionError> {
        info!(request = %request_id.0, "auto-submitting approved application downstream");
        self.submissions
            .lock()
            .expect("gateway mutex poisoned")
            .push(request_id.clone());
        Ok(())
    }
}

pub(crate) fn default_assessment_config() -> AssessmentConfig {
    AssessmentConfig {
        minimum_debt_service_cover: 1.25,
        referral_debt_service_cover: 1.5,
        minimum_years_trading: 2,
        maximum_principal_to_revenue: 1.0,
    }
}

pub(crate) fn default_workflow_config(signatures: SignaturePolicy) -> ApprovalWorkflowConfig {
    ApprovalWorkflowConfig {
        pricing: PricingPolicy::standard(),
        assessment: default_assessment_config(),
        signatures,
    }
}

pub(crate) fn load_directory(
    roster_csv: Option<PathBuf>,
) -> Result<SignatoryDirectory, AppError> {
    match roster_csv {
        Some(path) => RosterImporter::from_path(path).map_err(AppError::from),
        None => Ok(SignatoryDirectory::standard()),
    }
}

pub(crate) fn parse_frequency(raw: &str) -> Result<PaymentFrequency, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "annual" | "yearly" => Ok(PaymentFrequency::Annual),
        "semi-annual" | "semi_annual" | "half-yearly" => Ok(PaymentFrequency::SemiAnnual),
        "quarterly" => Ok(PaymentFrequency::Quarterly),
        "monthly" => Ok(PaymentFrequency::Monthly),
        other => Err(format!(
            "unknown frequency '{other}' (expected annual, semi-annual, quarterly, or monthly)"
        )),
    }
}

pub(crate) fn parse_product(raw: &str) -> Result<ProductCategory, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "working-capital" | "working_capital" => Ok(ProductCategory::WorkingCapital),
        "equipment" | "equipment-finance" => Ok(ProductCategory::EquipmentFinance),
        "green" | "green-investment" => Ok(ProductCategory::GreenInvestment),
        "property" | "property-bridge" => Ok(ProductCategory::PropertyBridge),
        other => Err(format!(
            "unknown product '{other}' (expected working-capital, equipment, green, or property)"
        )),
    }
}
