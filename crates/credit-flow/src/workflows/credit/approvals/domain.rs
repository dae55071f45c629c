use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for submitted approval requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApprovalRequestId(pub String);

/// Identifier for an authorized signatory (company director).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SignatoryId(pub String);

/// Lifecycle of an approval request. `Approved`, `Expired`, and `Rejected`
/// are terminal; no transition leaves a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Pending,
    CreditApprovedAwaitingSignature,
    Approved,
    Expired,
    Rejected,
}

impl ApprovalStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::CreditApprovedAwaitingSignature => "credit_approved_awaiting_signature",
            Self::Approved => "approved",
            Self::Expired => "expired",
            Self::Rejected => "rejected",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Approved | Self::Expired | Self::Rejected)
    }
}

/// A single recorded signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignatoryApproval {
    pub signatory_id: SignatoryId,
    pub signed_at: DateTime<Utc>,
    pub signature_proof: String,
}

/// What happened when a signature was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureOutcome {
    /// Signature appended; quorum not yet met or credit decision pending.
    Recorded,
    /// Signature appended and quorum reached; the request is now approved.
    Finalized,
    /// The signatory had already signed; the request is unchanged.
    AlreadyRecorded,
}

impl SignatureOutcome {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Recorded => "recorded",
            Self::Finalized => "finalized",
            Self::AlreadyRecorded => "already_recorded",
        }
    }
}

/// What happened when the external credit decision was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionOutcome {
    AwaitingSignatures,
    /// Quorum had already been met, so the request finalized immediately.
    Finalized,
}

/// State-machine violations raised by request mutations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApprovalError {
    #[error("signing window closed at {expired_at}")]
    AlreadyExpired { expired_at: DateTime<Utc> },
    #[error("request is {} and accepts no further changes", .status.label())]
    InvalidState { status: ApprovalStatus },
}

/// One submitted application awaiting signatory quorum.
///
/// Expiry is evaluated lazily against the `now` passed into each operation;
/// there is no background timer. Approvals are an append-only set keyed by
/// signatory, and over-signing past quorum is tolerated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalRequest {
    pub id: ApprovalRequestId,
    pub amount: f64,
    pub submitter_id: SignatoryId,
    pub required_quorum: u32,
    pub approvals: Vec<SignatoryApproval>,
    pub status: ApprovalStatus,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl ApprovalRequest {
    pub fn open(
        id: ApprovalRequestId,
        amount: f64,
        submitter_id: SignatoryId,
        required_quorum: u32,
        signing_window: Duration,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            amount,
            submitter_id,
            required_quorum,
            approvals: Vec::new(),
            status: ApprovalStatus::Pending,
            created_at: now,
            expires_at: now + signing_window,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    pub fn quorum_met(&self) -> bool {
        self.approvals.len() as u32 >= self.required_quorum
    }

    pub fn has_signed(&self, signatory_id: &SignatoryId) -> bool {
        self.approvals
            .iter()
            .any(|approval| &approval.signatory_id == signatory_id)
    }

    /// Record one signatory's approval.
    ///
    /// Expiry takes precedence over every other consideration. A signatory
    /// re-approving is an idempotent no-op, including retries against an
    /// already-approved request. The approval that meets quorum while the
    /// credit decision is in place finalizes the request exactly once.
    pub fn record_approval(
        &mut self,
        signatory_id: SignatoryId,
        signature_proof: String,
        now: DateTime<Utc>,
    ) -> Result<SignatureOutcome, ApprovalError> {
        if let Some(err) = self.close_if_expired(now) {
            return Err(err);
        }
        if self.has_signed(&signatory_id) {
            return Ok(SignatureOutcome::AlreadyRecorded);
        }
        if self.status.is_terminal() {
            return Err(ApprovalError::InvalidState {
                status: self.status,
            });
        }

        self.approvals.push(SignatoryApproval {
            signatory_id,
            signed_at: now,
            signature_proof,
        });

        if self.quorum_met() && self.status == ApprovalStatus::CreditApprovedAwaitingSignature {
            self.status = ApprovalStatus::Approved;
            return Ok(SignatureOutcome::Finalized);
        }

        Ok(SignatureOutcome::Recorded)
    }

    /// Apply the external credit decision. Repeated calls while awaiting
    /// signatures are no-ops; if quorum was gathered while the decision was
    /// outstanding, the request finalizes immediately.
    pub fn mark_credit_approved(
        &mut self,
        now: DateTime<Utc>,
    ) -> Result<DecisionOutcome, ApprovalError> {
        if let Some(err) = self.close_if_expired(now) {
            return Err(err);
        }
        match self.status {
            ApprovalStatus::Pending => {
                if self.quorum_met() {
                    self.status = ApprovalStatus::Approved;
                    Ok(DecisionOutcome::Finalized)
                } else {
                    self.status = ApprovalStatus::CreditApprovedAwaitingSignature;
                    Ok(DecisionOutcome::AwaitingSignatures)
                }
            }
            ApprovalStatus::CreditApprovedAwaitingSignature => {
                Ok(DecisionOutcome::AwaitingSignatures)
            }
            status => Err(ApprovalError::InvalidState { status }),
        }
    }

    /// External rejection from any non-terminal state.
    pub fn reject(&mut self, now: DateTime<Utc>) -> Result<(), ApprovalError> {
        if let Some(err) = self.close_if_expired(now) {
            return Err(err);
        }
        match self.status {
            ApprovalStatus::Pending | ApprovalStatus::CreditApprovedAwaitingSignature => {
                self.status = ApprovalStatus::Rejected;
                Ok(())
            }
            status => Err(ApprovalError::InvalidState { status }),
        }
    }

    /// Lazily retire the request once its signing window has passed. Returns
    /// the error to surface when the window is closed.
    fn close_if_expired(&mut self, now: DateTime<Utc>) -> Option<ApprovalError> {
        if self.status == ApprovalStatus::Expired {
            return Some(ApprovalError::AlreadyExpired {
                expired_at: self.expires_at,
            });
        }
        if !self.status.is_terminal() && self.is_expired(now) {
            self.status = ApprovalStatus::Expired;
            return Some(ApprovalError::AlreadyExpired {
                expired_at: self.expires_at,
            });
        }
        None
    }

    /// Expire a non-terminal request whose window has passed. Used by read
    /// paths so views never show a stale `pending` state. Returns whether the
    /// status changed.
    pub fn expire_if_due(&mut self, now: DateTime<Utc>) -> bool {
        if !self.status.is_terminal() && self.is_expired(now) {
            self.status = ApprovalStatus::Expired;
            return true;
        }
        false
    }
}
