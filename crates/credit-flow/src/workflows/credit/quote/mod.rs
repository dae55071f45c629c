//! Repayment quoting: the pure amortization calculator, the rate-adjustment
//! pricing policy layered in front of it, and the editable quote builder.

mod amortization;
mod builder;
pub mod domain;
mod pricing;

pub use amortization::{amortize, AmortizationError};
pub use builder::{CreditQuote, QuoteError, QuoteLine, QuoteTotals};
pub use domain::{LoanItem, PaymentFrequency, ProductCategory, RepaymentSchedule};
pub use pricing::{PricingPolicy, TermRateStep};

pub(crate) use amortization::round_cents;
