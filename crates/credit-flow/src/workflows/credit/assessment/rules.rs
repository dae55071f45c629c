use super::config::AssessmentConfig;
use super::{AssessmentFactor, ScoreComponent};
use crate::workflows::credit::intake::ApplicationProfile;
use crate::workflows::credit::quote::ProductCategory;

pub(crate) struct AssessmentSignals {
    pub debt_service_cover: f64,
    pub principal_to_revenue: f64,
}

pub(crate) fn score_profile(
    profile: &ApplicationProfile,
    config: &AssessmentConfig,
) -> (Vec<ScoreComponent>, i16, AssessmentSignals) {
    let mut components = Vec::new();
    let mut total_score: i16 = 0;

    let total_debt_service =
        profile.financials.existing_annual_debt_service + profile.new_annual_debt_service();
    // Requested items always carry a positive payment, so the denominator is
    // never zero for a profile that cleared intake.
    let debt_service_cover = profile.financials.annual_net_profit / total_debt_service;

    if debt_service_cover >= config.referral_debt_service_cover {
        components.push(ScoreComponent {
            factor: AssessmentFactor::DebtServiceCover,
            score: 30,
            notes: format!(
                "debt service cover {:.2} clears the {:.2} auto-approve threshold",
                debt_service_cover, config.referral_debt_service_cover
            ),
        });
        total_score += 30;
    } else if debt_service_cover >= config.minimum_debt_service_cover {
        components.push(ScoreComponent {
            factor: AssessmentFactor::DebtServiceCover,
            score: 10,
            notes: format!(
                "cover {:.2} above the {:.2} minimum but inside the referral band",
                debt_service_cover, config.minimum_debt_service_cover
            ),
        });
        total_score += 10;
    } else {
        components.push(ScoreComponent {
            factor: AssessmentFactor::DebtServiceCover,
            score: -40,
            notes: format!(
                "cover {:.2} below required {:.2}",
                debt_service_cover, config.minimum_debt_service_cover
            ),
        });
        total_score -= 40;
    }

    let principal_to_revenue =
        profile.totals.total_principal / profile.financials.annual_revenue;
    if principal_to_revenue <= config.maximum_principal_to_revenue {
        components.push(ScoreComponent {
            factor: AssessmentFactor::PrincipalToRevenue,
            score: 20,
            notes: format!(
                "requested principal is {:.2}x annual revenue (limit {:.2}x)",
                principal_to_revenue, config.maximum_principal_to_revenue
            ),
        });
        total_score += 20;
    } else {
        components.push(ScoreComponent {
            factor: AssessmentFactor::PrincipalToRevenue,
            score: -25,
            notes: format!(
                "requested principal {:.2}x revenue exceeds the {:.2}x limit",
                principal_to_revenue, config.maximum_principal_to_revenue
            ),
        });
        total_score -= 25;
    }

    if profile.business.years_trading >= config.minimum_years_trading {
        components.push(ScoreComponent {
            factor: AssessmentFactor::TradingHistory,
            score: 10,
            notes: format!(
                "{} year(s) trading meets the {}-year minimum",
                profile.business.years_trading, config.minimum_years_trading
            ),
        });
        total_score += 10;
    } else {
        components.push(ScoreComponent {
            factor: AssessmentFactor::TradingHistory,
            score: -10,
            notes: format!(
                "{} year(s) trading below the {}-year minimum",
                profile.business.years_trading, config.minimum_years_trading
            ),
        });
        total_score -= 10;
    }

    let green_principal: f64 = profile
        .lines
        .iter()
        .filter(|line| line.item.product == ProductCategory::GreenInvestment)
        .map(|line| line.item.principal)
        .sum();
    if green_principal > 0.0 {
        components.push(ScoreComponent {
            factor: AssessmentFactor::GreenPortfolio,
            score: 5,
            notes: format!(
                "{:.0}% of requested principal qualifies for the green programme",
                green_principal / profile.totals.total_principal * 100.0
            ),
        });
        total_score += 5;
    }

    let signals = AssessmentSignals {
        debt_service_cover,
        principal_to_revenue,
    };

    (components, total_score, signals)
}
