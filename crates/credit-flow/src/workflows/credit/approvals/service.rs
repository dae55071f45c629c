use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;

use super::domain::{
    ApprovalError, ApprovalRequest, ApprovalRequestId, DecisionOutcome, SignatureOutcome,
    SignatoryId,
};
use super::policy::SignaturePolicy;
use super::repository::{
    ApprovalRecord, ApprovalRepository, NoticeKind, RepositoryError, SignatoryNotice,
    SignatoryNotifier, SubmissionError, SubmissionGateway,
};
use crate::workflows::credit::assessment::{
    AssessmentConfig, AssessmentEngine, AssessmentOutcome, CreditDecision,
};
use crate::workflows::credit::intake::{ApplicationSubmission, IntakeError, IntakeGuard};
use crate::workflows::credit::quote::PricingPolicy;
use crate::workflows::roster::SignatoryDirectory;

/// Bundled policy inputs for the approval workflow.
#[derive(Debug, Clone)]
pub struct ApprovalWorkflowConfig {
    pub pricing: PricingPolicy,
    pub assessment: AssessmentConfig,
    pub signatures: SignaturePolicy,
}

/// Service composing the intake guard, assessment engine, signature policy,
/// and the external boundaries (repository, notifier, downstream gateway).
pub struct DirectorApprovalService<R, N, G> {
    guard: IntakeGuard,
    engine: Arc<AssessmentEngine>,
    policy: SignaturePolicy,
    directory: SignatoryDirectory,
    repository: Arc<R>,
    notifier: Arc<N>,
    gateway: Arc<G>,
    // Serializes read-modify-write cycles so concurrent signatures against
    // the same request cannot lose updates.
    write_gate: Mutex<()>,
}

static REQUEST_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_request_id() -> ApprovalRequestId {
    let id = REQUEST_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApprovalRequestId(format!("req-{id:06}"))
}

impl<R, N, G> DirectorApprovalService<R, N, G>
where
    R: ApprovalRepository + 'static,
    N: SignatoryNotifier + 'static,
    G: SubmissionGateway + 'static,
{
    pub fn new(
        repository: Arc<R>,
        notifier: Arc<N>,
        gateway: Arc<G>,
        directory: SignatoryDirectory,
        config: ApprovalWorkflowConfig,
    ) -> Self {
        Self {
            guard: IntakeGuard::with_pricing(config.pricing),
            engine: Arc::new(AssessmentEngine::new(config.assessment)),
            policy: config.signatures,
            directory,
            repository,
            notifier,
            gateway,
            write_gate: Mutex::new(()),
        }
    }

    pub fn directory(&self) -> &SignatoryDirectory {
        &self.directory
    }

    pub fn signature_policy(&self) -> &SignaturePolicy {
        &self.policy
    }

    /// Submit a new application: validate and price the request, open the
    /// approval record at the amount-derived quorum, and ask every signatory
    /// on the roster to sign.
    pub fn submit(
        &self,
        submission: ApplicationSubmission,
    ) -> Result<ApprovalRecord, ApprovalServiceError> {
        let profile = self.guard.profile_from_submission(submission)?;
        let amount = profile.totals.total_principal;
        let now = Utc::now();

        let request = ApprovalRequest::open(
            next_request_id(),
            amount,
            profile.submitter_id.clone(),
            self.policy.required_quorum(amount),
            self.policy.signing_window(),
            now,
        );
        let record = ApprovalRecord {
            request,
            profile,
            assessment: None,
        };

        let stored = self.repository.insert(record)?;

        let mut details = BTreeMap::new();
        details.insert("amount".to_string(), format!("{amount:.2}"));
        details.insert(
            "required_quorum".to_string(),
            stored.request.required_quorum.to_string(),
        );
        self.dispatch(NoticeKind::SignatureRequest, &stored, details);

        Ok(stored)
    }

    /// Run the configured assessment and apply its verdict to the request:
    /// approval moves it into the signing stage, a decline rejects it, and a
    /// referral leaves it pending for a credit officer.
    pub fn assess(
        &self,
        id: &ApprovalRequestId,
    ) -> Result<AssessmentOutcome, ApprovalServiceError> {
        let _gate = self.write_gate.lock().expect("approval write gate poisoned");
        let mut record = self.repository.fetch(id)?.ok_or(RepositoryError::NotFound)?;

        let outcome = self.engine.score(&record.profile);
        let now = Utc::now();
        let prior_status = record.request.status;

        let transition = match &outcome.decision {
            CreditDecision::Approved => record
                .request
                .mark_credit_approved(now)
                .map(|result| matches!(result, DecisionOutcome::Finalized)),
            CreditDecision::Declined(_) => record.request.reject(now).map(|_| false),
            CreditDecision::Referred { .. } => Ok(false),
        };

        match transition {
            Ok(finalized) => {
                record.assessment = Some(outcome.clone());
                self.repository.update(record.clone())?;

                if finalized {
                    self.finalize(&record)?;
                }

                let mut details = BTreeMap::new();
                details.insert("decision".to_string(), outcome.decision.summary());
                self.dispatch(NoticeKind::Info, &record, details);

                Ok(outcome)
            }
            Err(err) => {
                // Keep the lazy expiry transition even though the call failed.
                if record.request.status != prior_status {
                    self.repository.update(record)?;
                }
                Err(err.into())
            }
        }
    }

    /// Record one signatory's approval. Re-submissions by a signatory who has
    /// already signed are no-ops; the signature that meets quorum finalizes
    /// the request and hands it to the downstream gateway exactly once.
    pub fn record_signature(
        &self,
        id: &ApprovalRequestId,
        signatory_id: SignatoryId,
        signature_proof: String,
    ) -> Result<(SignatureOutcome, ApprovalRecord), ApprovalServiceError> {
        if !self.directory.contains(&signatory_id) {
            return Err(ApprovalServiceError::UnknownSignatory(signatory_id.0));
        }

        let _gate = self.write_gate.lock().expect("approval write gate poisoned");
        let mut record = self.repository.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        let now = Utc::now();
        let prior_status = record.request.status;

        match record
            .request
            .record_approval(signatory_id, signature_proof, now)
        {
            Ok(outcome) => {
                if outcome != SignatureOutcome::AlreadyRecorded {
                    self.repository.update(record.clone())?;
                }
                if outcome == SignatureOutcome::Finalized {
                    self.finalize(&record)?;
                }
                Ok((outcome, record))
            }
            Err(err) => {
                if record.request.status != prior_status {
                    self.repository.update(record)?;
                }
                Err(err.into())
            }
        }
    }

    /// External rejection (e.g., the applicant withdraws or an officer
    /// overrides).
    pub fn reject(&self, id: &ApprovalRequestId) -> Result<ApprovalRecord, ApprovalServiceError> {
        let _gate = self.write_gate.lock().expect("approval write gate poisoned");
        let mut record = self.repository.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        let now = Utc::now();
        let prior_status = record.request.status;

        match record.request.reject(now) {
            Ok(()) => {
                self.repository.update(record.clone())?;
                let mut details = BTreeMap::new();
                details.insert("event".to_string(), "rejected".to_string());
                self.dispatch(NoticeKind::Info, &record, details);
                Ok(record)
            }
            Err(err) => {
                if record.request.status != prior_status {
                    self.repository.update(record)?;
                }
                Err(err.into())
            }
        }
    }

    /// Fetch a request for status views, retiring it first when the signing
    /// window has lapsed so reads never show a stale open state.
    pub fn get(&self, id: &ApprovalRequestId) -> Result<ApprovalRecord, ApprovalServiceError> {
        let _gate = self.write_gate.lock().expect("approval write gate poisoned");
        let mut record = self.repository.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        if record.request.expire_if_due(Utc::now()) {
            self.repository.update(record.clone())?;
        }
        Ok(record)
    }

    fn finalize(&self, record: &ApprovalRecord) -> Result<(), ApprovalServiceError> {
        self.gateway.submit_approved(&record.request.id)?;
        let mut details = BTreeMap::new();
        details.insert("event".to_string(), "fully_approved".to_string());
        self.dispatch(NoticeKind::Info, record, details);
        Ok(())
    }

    fn dispatch(&self, kind: NoticeKind, record: &ApprovalRecord, details: BTreeMap<String, String>) {
        // Fire-and-forget: delivery failures never affect the request lifecycle.
        let _ = self.notifier.notify(SignatoryNotice {
            kind,
            request_id: record.request.id.clone(),
            recipients: self.directory.ids(),
            details,
        });
    }
}

/// Error raised by the approval service.
#[derive(Debug, thiserror::Error)]
pub enum ApprovalServiceError {
    #[error(transparent)]
    Intake(#[from] IntakeError),
    #[error(transparent)]
    Approval(#[from] ApprovalError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    #[error("signatory {0} is not on the authorized roster")]
    UnknownSignatory(String),
}
