use serde::{Deserialize, Serialize};

/// Rubric configuration for the deterministic credit assessment.
///
/// Debt-service cover below `minimum_debt_service_cover` declines the
/// application outright; cover inside `[minimum, referral)` refers it to a
/// credit officer instead of approving automatically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentConfig {
    pub minimum_debt_service_cover: f64,
    pub referral_debt_service_cover: f64,
    pub minimum_years_trading: u8,
    pub maximum_principal_to_revenue: f64,
}
