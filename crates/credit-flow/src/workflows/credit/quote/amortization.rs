use super::domain::{LoanItem, RepaymentSchedule};

/// Calculator input failures, surfaced before any arithmetic runs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AmortizationError {
    #[error("principal must be positive, got {0}")]
    NonPositivePrincipal(f64),
    #[error("term must cover at least one month")]
    ZeroTerm,
    #[error("annual rate must not be negative, got {0}")]
    NegativeRate(f64),
    #[error("{term_months} months at {payments_per_year} payments per year yields no whole repayment period")]
    NoRepaymentPeriods {
        term_months: u32,
        payments_per_year: u32,
    },
}

/// Round a monetary value to cents, half away from zero.
pub(crate) fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Equal-installment (annuity) schedule for a fixed-rate, fixed-term item.
///
/// Term/frequency combinations that do not divide into a whole number of
/// payments are rounded to the nearest count; callers are expected to supply
/// terms that divide evenly. Totals are derived from the unrounded payment,
/// then every monetary output is rounded to cents.
pub fn amortize(item: &LoanItem) -> Result<RepaymentSchedule, AmortizationError> {
    if !(item.principal > 0.0) || !item.principal.is_finite() {
        return Err(AmortizationError::NonPositivePrincipal(item.principal));
    }
    if item.term_months == 0 {
        return Err(AmortizationError::ZeroTerm);
    }
    if item.annual_rate_percent < 0.0 || !item.annual_rate_percent.is_finite() {
        return Err(AmortizationError::NegativeRate(item.annual_rate_percent));
    }

    let payments_per_year = item.frequency.payments_per_year();
    let payment_count =
        (item.term_months as f64 / 12.0 * payments_per_year as f64).round() as u32;
    if payment_count == 0 {
        return Err(AmortizationError::NoRepaymentPeriods {
            term_months: item.term_months,
            payments_per_year,
        });
    }

    let period_rate = item.annual_rate_percent / 100.0 / payments_per_year as f64;
    let periodic_payment = if period_rate == 0.0 {
        item.principal / payment_count as f64
    } else {
        let growth = (1.0 + period_rate).powi(payment_count as i32);
        item.principal * period_rate * growth / (growth - 1.0)
    };

    let total_payments = periodic_payment * payment_count as f64;
    let total_interest = total_payments - item.principal;

    Ok(RepaymentSchedule {
        periodic_payment: round_cents(periodic_payment),
        payment_count,
        total_payments: round_cents(total_payments),
        total_interest: round_cents(total_interest),
    })
}
