use serde::{Deserialize, Serialize};

use super::amortization::{amortize, round_cents, AmortizationError};
use super::domain::{LoanItem, RepaymentSchedule};
use super::pricing::PricingPolicy;

/// Quote edit failures.
#[derive(Debug, thiserror::Error)]
pub enum QuoteError {
    #[error(transparent)]
    Amortization(#[from] AmortizationError),
    #[error("quote line {0} not found")]
    LineNotFound(usize),
    #[error("quote is finalized and no longer accepts edits")]
    Finalized,
}

/// A priced line: the item as configured, the rate actually charged after
/// policy adjustments, and the derived schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteLine {
    pub item: LoanItem,
    pub charged_rate_percent: f64,
    pub schedule: RepaymentSchedule,
}

/// Aggregate figures across every line of a quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteTotals {
    pub total_principal: f64,
    pub total_interest: f64,
    pub total_repayable: f64,
}

/// Quote under construction. Every edit reprices the touched line so the
/// derived schedules always reflect the latest items; finalizing locks the
/// quote against further edits.
#[derive(Debug, Clone)]
pub struct CreditQuote {
    pricing: PricingPolicy,
    lines: Vec<QuoteLine>,
    finalized: bool,
}

impl CreditQuote {
    pub fn new(pricing: PricingPolicy) -> Self {
        Self {
            pricing,
            lines: Vec::new(),
            finalized: false,
        }
    }

    pub fn add_item(&mut self, item: LoanItem) -> Result<usize, QuoteError> {
        self.ensure_open()?;
        let line = self.price(item)?;
        self.lines.push(line);
        Ok(self.lines.len() - 1)
    }

    pub fn update_item(&mut self, index: usize, item: LoanItem) -> Result<(), QuoteError> {
        self.ensure_open()?;
        if index >= self.lines.len() {
            return Err(QuoteError::LineNotFound(index));
        }
        self.lines[index] = self.price(item)?;
        Ok(())
    }

    pub fn remove_item(&mut self, index: usize) -> Result<LoanItem, QuoteError> {
        self.ensure_open()?;
        if index >= self.lines.len() {
            return Err(QuoteError::LineNotFound(index));
        }
        Ok(self.lines.remove(index).item)
    }

    pub fn lines(&self) -> &[QuoteLine] {
        &self.lines
    }

    pub fn totals(&self) -> QuoteTotals {
        let total_principal: f64 = self.lines.iter().map(|line| line.item.principal).sum();
        let total_interest: f64 = self
            .lines
            .iter()
            .map(|line| line.schedule.total_interest)
            .sum();
        let total_repayable: f64 = self
            .lines
            .iter()
            .map(|line| line.schedule.total_payments)
            .sum();

        QuoteTotals {
            total_principal: round_cents(total_principal),
            total_interest: round_cents(total_interest),
            total_repayable: round_cents(total_repayable),
        }
    }

    /// Lock the quote. Idempotent.
    pub fn finalize(&mut self) {
        self.finalized = true;
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    fn ensure_open(&self) -> Result<(), QuoteError> {
        if self.finalized {
            return Err(QuoteError::Finalized);
        }
        Ok(())
    }

    fn price(&self, item: LoanItem) -> Result<QuoteLine, QuoteError> {
        let priced = self.pricing.priced(&item);
        let schedule = amortize(&priced)?;
        Ok(QuoteLine {
            item,
            charged_rate_percent: priced.annual_rate_percent,
            schedule,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::credit::quote::domain::{PaymentFrequency, ProductCategory};

    fn working_capital(principal: f64) -> LoanItem {
        LoanItem {
            product: ProductCategory::WorkingCapital,
            principal,
            annual_rate_percent: 5.5,
            term_months: 36,
            frequency: PaymentFrequency::Monthly,
        }
    }

    #[test]
    fn edits_reprice_the_touched_line() {
        let mut quote = CreditQuote::new(PricingPolicy::standard());
        let index = quote
            .add_item(working_capital(50_000.0))
            .expect("item prices");
        let before = quote.lines()[index].schedule.clone();

        quote
            .update_item(index, working_capital(75_000.0))
            .expect("update prices");
        let after = &quote.lines()[index].schedule;

        assert!(after.periodic_payment > before.periodic_payment);
        assert_eq!(after.payment_count, before.payment_count);
    }

    #[test]
    fn totals_aggregate_every_line() {
        let mut quote = CreditQuote::new(PricingPolicy::passthrough());
        quote
            .add_item(working_capital(50_000.0))
            .expect("first line");
        quote
            .add_item(working_capital(25_000.0))
            .expect("second line");

        let totals = quote.totals();
        assert!((totals.total_principal - 75_000.0).abs() < 0.01);
        assert!(totals.total_interest > 0.0);
        assert!(
            (totals.total_repayable - totals.total_principal - totals.total_interest).abs() < 0.05
        );
    }

    #[test]
    fn finalized_quotes_reject_edits() {
        let mut quote = CreditQuote::new(PricingPolicy::standard());
        let index = quote.add_item(working_capital(50_000.0)).expect("line");
        quote.finalize();
        quote.finalize(); // idempotent

        assert!(matches!(
            quote.add_item(working_capital(10_000.0)),
            Err(QuoteError::Finalized)
        ));
        assert!(matches!(
            quote.update_item(index, working_capital(10_000.0)),
            Err(QuoteError::Finalized)
        ));
        assert!(matches!(
            quote.remove_item(index),
            Err(QuoteError::Finalized)
        ));
        assert!(quote.is_finalized());
    }

    #[test]
    fn invalid_items_surface_calculator_errors() {
        let mut quote = CreditQuote::new(PricingPolicy::standard());
        let result = quote.add_item(working_capital(0.0));
        assert!(matches!(result, Err(QuoteError::Amortization(_))));
        assert!(quote.lines().is_empty());
    }

    #[test]
    fn missing_lines_are_reported() {
        let mut quote = CreditQuote::new(PricingPolicy::standard());
        assert!(matches!(
            quote.update_item(3, working_capital(10_000.0)),
            Err(QuoteError::LineNotFound(3))
        ));
    }
}
