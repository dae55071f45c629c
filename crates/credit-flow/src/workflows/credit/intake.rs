use serde::{Deserialize, Serialize};

use super::approvals::SignatoryId;
use super::quote::{
    amortize, round_cents, AmortizationError, LoanItem, PricingPolicy, QuoteLine, QuoteTotals,
};

/// Validation errors raised by the intake guard.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("application must request at least one credit product")]
    EmptyQuote,
    #[error("declared annual revenue must be positive")]
    MissingRevenue,
    #[error("existing debt service must not be negative")]
    NegativeDebtService,
    #[error(transparent)]
    Amortization(#[from] AmortizationError),
}

/// Registered-company details captured at intake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessSnapshot {
    pub legal_name: String,
    pub registration_number: String,
    pub years_trading: u8,
}

/// Declared financial position used by the assessment rubric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancialSnapshot {
    pub annual_revenue: f64,
    pub annual_net_profit: f64,
    pub existing_annual_debt_service: f64,
}

/// Applicant-provided payload for a new credit application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationSubmission {
    pub business: BusinessSnapshot,
    pub financials: FinancialSnapshot,
    pub requested_items: Vec<LoanItem>,
    pub submitter_id: SignatoryId,
}

/// The validated, priced domain model after intake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationProfile {
    pub business: BusinessSnapshot,
    pub financials: FinancialSnapshot,
    pub lines: Vec<QuoteLine>,
    pub totals: QuoteTotals,
    pub submitter_id: SignatoryId,
}

impl ApplicationProfile {
    /// Yearly cash needed to service the requested lending.
    pub fn new_annual_debt_service(&self) -> f64 {
        self.lines
            .iter()
            .map(|line| line.schedule.annual_debt_service(line.item.frequency))
            .sum()
    }
}

/// Guard responsible for producing `ApplicationProfile` instances: every
/// requested item must amortize under the active pricing policy and the
/// declared financials must be usable by the rubric.
#[derive(Debug, Clone)]
pub struct IntakeGuard {
    pricing: PricingPolicy,
}

impl Default for IntakeGuard {
    fn default() -> Self {
        Self::with_pricing(PricingPolicy::standard())
    }
}

impl IntakeGuard {
    pub fn with_pricing(pricing: PricingPolicy) -> Self {
        Self { pricing }
    }

    pub fn pricing(&self) -> &PricingPolicy {
        &self.pricing
    }

    pub fn profile_from_submission(
        &self,
        submission: ApplicationSubmission,
    ) -> Result<ApplicationProfile, IntakeError> {
        if submission.requested_items.is_empty() {
            return Err(IntakeError::EmptyQuote);
        }
        if !(submission.financials.annual_revenue > 0.0) {
            return Err(IntakeError::MissingRevenue);
        }
        if submission.financials.existing_annual_debt_service < 0.0 {
            return Err(IntakeError::NegativeDebtService);
        }

        let mut lines = Vec::with_capacity(submission.requested_items.len());
        for item in submission.requested_items {
            let priced = self.pricing.priced(&item);
            let schedule = amortize(&priced)?;
            lines.push(QuoteLine {
                item,
                charged_rate_percent: priced.annual_rate_percent,
                schedule,
            });
        }

        let total_principal: f64 = lines.iter().map(|line| line.item.principal).sum();
        let total_interest: f64 = lines.iter().map(|line| line.schedule.total_interest).sum();
        let total_repayable: f64 = lines.iter().map(|line| line.schedule.total_payments).sum();
        let totals = QuoteTotals {
            total_principal: round_cents(total_principal),
            total_interest: round_cents(total_interest),
            total_repayable: round_cents(total_repayable),
        };

        Ok(ApplicationProfile {
            business: submission.business,
            financials: submission.financials,
            lines,
            totals,
            submitter_id: submission.submitter_id,
        })
    }
}
