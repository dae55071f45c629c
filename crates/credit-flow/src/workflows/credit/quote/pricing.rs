use serde::{Deserialize, Serialize};

use super::domain::{LoanItem, ProductCategory};

/// Rate step applied to items whose term falls at or below the bucket bound.
/// Buckets are evaluated in order; keep them sorted by `max_term_months`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TermRateStep {
    pub max_term_months: u32,
    pub delta_percent: f64,
}

/// Pre-calculator rate adjustments: a sustainability discount for the green
/// product family plus steps keyed by term-length bucket. Applied before the
/// amortization calculator; the calculator contract itself is untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingPolicy {
    pub green_discount_percent: f64,
    pub term_steps: Vec<TermRateStep>,
    pub long_term_delta_percent: f64,
    pub floor_percent: f64,
}

impl PricingPolicy {
    /// House pricing grid used across quotes and demos.
    pub fn standard() -> Self {
        Self {
            green_discount_percent: 0.40,
            term_steps: vec![
                TermRateStep {
                    max_term_months: 12,
                    delta_percent: -0.25,
                },
                TermRateStep {
                    max_term_months: 36,
                    delta_percent: 0.0,
                },
                TermRateStep {
                    max_term_months: 60,
                    delta_percent: 0.25,
                },
            ],
            long_term_delta_percent: 0.50,
            floor_percent: 0.0,
        }
    }

    /// Identity policy: no discount, no steps, zero floor.
    pub fn passthrough() -> Self {
        Self {
            green_discount_percent: 0.0,
            term_steps: Vec::new(),
            long_term_delta_percent: 0.0,
            floor_percent: 0.0,
        }
    }

    pub fn adjusted_rate(&self, item: &LoanItem) -> f64 {
        let mut rate = item.annual_rate_percent;
        if item.product == ProductCategory::GreenInvestment {
            rate -= self.green_discount_percent;
        }
        rate += self.term_delta(item.term_months);
        rate.max(self.floor_percent)
    }

    fn term_delta(&self, term_months: u32) -> f64 {
        for step in &self.term_steps {
            if term_months <= step.max_term_months {
                return step.delta_percent;
            }
        }
        self.long_term_delta_percent
    }

    /// Copy of the item carrying the rate actually charged, ready for the
    /// calculator.
    pub fn priced(&self, item: &LoanItem) -> LoanItem {
        LoanItem {
            annual_rate_percent: self.adjusted_rate(item),
            ..item.clone()
        }
    }
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::credit::quote::domain::PaymentFrequency;

    fn item(product: ProductCategory, rate: f64, term_months: u32) -> LoanItem {
        LoanItem {
            product,
            principal: 100_000.0,
            annual_rate_percent: rate,
            term_months,
            frequency: PaymentFrequency::Monthly,
        }
    }

    #[test]
    fn mid_term_working_capital_keeps_base_rate() {
        let policy = PricingPolicy::standard();
        let rate = policy.adjusted_rate(&item(ProductCategory::WorkingCapital, 5.5, 36));
        assert!((rate - 5.5).abs() < f64::EPSILON);
    }

    #[test]
    fn green_items_earn_the_discount() {
        let policy = PricingPolicy::standard();
        let rate = policy.adjusted_rate(&item(ProductCategory::GreenInvestment, 5.5, 36));
        assert!((rate - 5.1).abs() < 1e-9);
    }

    #[test]
    fn short_terms_step_down_and_long_terms_step_up() {
        let policy = PricingPolicy::standard();
        assert!(
            (policy.adjusted_rate(&item(ProductCategory::WorkingCapital, 5.5, 12)) - 5.25).abs()
                < 1e-9
        );
        assert!(
            (policy.adjusted_rate(&item(ProductCategory::WorkingCapital, 5.5, 48)) - 5.75).abs()
                < 1e-9
        );
        assert!(
            (policy.adjusted_rate(&item(ProductCategory::WorkingCapital, 5.5, 84)) - 6.0).abs()
                < 1e-9
        );
    }

    #[test]
    fn adjustments_never_price_below_the_floor() {
        let policy = PricingPolicy::standard();
        let rate = policy.adjusted_rate(&item(ProductCategory::GreenInvestment, 0.3, 12));
        assert!((rate - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn passthrough_leaves_items_unchanged() {
        let policy = PricingPolicy::passthrough();
        let original = item(ProductCategory::GreenInvestment, 5.5, 84);
        assert_eq!(policy.priced(&original), original);
    }
}
