use super::common::*;
use crate::workflows::credit::assessment::{
    AssessmentEngine, AssessmentFactor, CreditDecision, DeclineReason, DecisionStrategy,
};
use crate::workflows::credit::intake::{ApplicationSubmission, IntakeGuard};
use crate::workflows::credit::quote::{LoanItem, PaymentFrequency, ProductCategory};

fn engine() -> AssessmentEngine {
    AssessmentEngine::new(assessment_config())
}

fn profile_for(submission: ApplicationSubmission) -> crate::workflows::credit::intake::ApplicationProfile {
    IntakeGuard::default()
        .profile_from_submission(submission)
        .expect("submission passes intake")
}

#[test]
fn strong_applications_are_approved() {
    let outcome = engine().score(&profile_for(submission()));
    assert!(matches!(outcome.decision, CreditDecision::Approved));
    assert!(outcome.total_score > 0);
    assert!(outcome
        .components
        .iter()
        .any(|component| component.factor == AssessmentFactor::DebtServiceCover));
}

#[test]
fn thin_cover_declines_with_the_shortfall_reported() {
    let mut weak = submission();
    weak.financials.annual_net_profit = 20_000.0;

    let outcome = engine().score(&profile_for(weak));
    match outcome.decision {
        CreditDecision::Declined(DeclineReason::InsufficientDebtServiceCover {
            required,
            actual,
        }) => {
            assert!((required - 1.25).abs() < 1e-9);
            assert!(actual < required);
        }
        other => panic!("expected cover decline, got {other:?}"),
    }
    assert!(outcome.total_score < 0);
}

#[test]
fn over_leveraged_requests_are_declined() {
    let mut leveraged = submission();
    leveraged.requested_items = vec![loan_item(600_000.0)];
    leveraged.financials.annual_net_profit = 400_000.0;

    let outcome = engine().score(&profile_for(leveraged));
    match outcome.decision {
        CreditDecision::Declined(DeclineReason::ExcessiveLeverage { actual_ratio, .. }) => {
            assert!(actual_ratio > 1.0);
        }
        other => panic!("expected leverage decline, got {other:?}"),
    }
}

#[test]
fn young_businesses_are_referred_not_declined() {
    let mut young = submission();
    young.business.years_trading = 1;

    let outcome = engine().score(&profile_for(young));
    match outcome.decision {
        CreditDecision::Referred { reasons } => {
            assert!(reasons.iter().any(|reason| reason.contains("trading history")));
        }
        other => panic!("expected referral, got {other:?}"),
    }
}

#[test]
fn cover_inside_the_referral_band_is_referred() {
    let mut marginal = submission();
    // Annual debt service for the 100k item is ~36.2k plus 12k existing, so
    // this profit lands between the 1.25 minimum and the 1.5 referral bar.
    marginal.financials.annual_net_profit = 65_000.0;

    let outcome = engine().score(&profile_for(marginal));
    match outcome.decision {
        CreditDecision::Referred { reasons } => {
            assert!(reasons.iter().any(|reason| reason.contains("referral band")));
        }
        other => panic!("expected referral, got {other:?}"),
    }
}

#[test]
fn green_lines_earn_a_portfolio_component() {
    let mut green = submission();
    green.requested_items.push(LoanItem {
        product: ProductCategory::GreenInvestment,
        principal: 25_000.0,
        annual_rate_percent: 5.5,
        term_months: 36,
        frequency: PaymentFrequency::Monthly,
    });

    let outcome = engine().score(&profile_for(green));
    assert!(outcome
        .components
        .iter()
        .any(|component| component.factor == AssessmentFactor::GreenPortfolio));
}

#[test]
fn the_engine_is_usable_through_the_strategy_seam() {
    let strategy: &dyn DecisionStrategy = &engine();
    let outcome = strategy.assess(&profile_for(submission()));
    assert!(matches!(outcome.decision, CreditDecision::Approved));
}

#[test]
fn decision_summaries_read_for_status_views() {
    assert_eq!(CreditDecision::Approved.summary(), "credit approved");
    let referred = CreditDecision::Referred {
        reasons: vec!["thin file".to_string()],
    };
    assert!(referred.summary().contains("thin file"));
    let declined = CreditDecision::Declined(DeclineReason::InsufficientDebtServiceCover {
        required: 1.25,
        actual: 0.8,
    });
    assert!(declined.summary().contains("insufficient debt service cover"));
}
