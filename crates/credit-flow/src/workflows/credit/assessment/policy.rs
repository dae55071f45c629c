use serde::{Deserialize, Serialize};

use super::config::AssessmentConfig;
use super::rules::AssessmentSignals;
use crate::workflows::credit::intake::ApplicationProfile;

/// Adjudication outcome for an assessed application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CreditDecision {
    Approved,
    Referred { reasons: Vec<String> },
    Declined(DeclineReason),
}

impl CreditDecision {
    pub fn summary(&self) -> String {
        match self {
            CreditDecision::Approved => "credit approved".to_string(),
            CreditDecision::Referred { reasons } => {
                if reasons.is_empty() {
                    "referred to credit officer".to_string()
                } else {
                    format!("referred to credit officer: {}", reasons.join("; "))
                }
            }
            CreditDecision::Declined(reason) => reason.summary(),
        }
    }
}

/// Enumerates decline reasons to support adverse-action notices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DeclineReason {
    InsufficientDebtServiceCover { required: f64, actual: f64 },
    ExcessiveLeverage { maximum_ratio: f64, actual_ratio: f64 },
}

impl DeclineReason {
    pub fn summary(&self) -> String {
        match self {
            DeclineReason::InsufficientDebtServiceCover { required, actual } => format!(
                "declined for insufficient debt service cover (required {:.2}, actual {:.2})",
                required, actual
            ),
            DeclineReason::ExcessiveLeverage {
                maximum_ratio,
                actual_ratio,
            } => format!(
                "declined for excessive borrowing against revenue (limit {:.2}, actual {:.2})",
                maximum_ratio, actual_ratio
            ),
        }
    }
}

pub(crate) fn decide_outcome(
    profile: &ApplicationProfile,
    config: &AssessmentConfig,
    signals: &AssessmentSignals,
) -> CreditDecision {
    if signals.debt_service_cover < config.minimum_debt_service_cover {
        return CreditDecision::Declined(DeclineReason::InsufficientDebtServiceCover {
            required: config.minimum_debt_service_cover,
            actual: signals.debt_service_cover,
        });
    }

    if signals.principal_to_revenue > config.maximum_principal_to_revenue {
        return CreditDecision::Declined(DeclineReason::ExcessiveLeverage {
            maximum_ratio: config.maximum_principal_to_revenue,
            actual_ratio: signals.principal_to_revenue,
        });
    }

    let mut referral_reasons = Vec::new();
    if profile.business.years_trading < config.minimum_years_trading {
        referral_reasons.push(format!(
            "trading history of {} year(s) below the {}-year threshold",
            profile.business.years_trading, config.minimum_years_trading
        ));
    }
    if signals.debt_service_cover < config.referral_debt_service_cover {
        referral_reasons.push(format!(
            "debt service cover {:.2} inside the referral band (below {:.2})",
            signals.debt_service_cover, config.referral_debt_service_cover
        ));
    }

    if !referral_reasons.is_empty() {
        return CreditDecision::Referred {
            reasons: referral_reasons,
        };
    }

    CreditDecision::Approved
}
