use serde::{Deserialize, Serialize};

/// Repayment cadences offered on SME credit products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentFrequency {
    Annual,
    SemiAnnual,
    Quarterly,
    Monthly,
}

impl PaymentFrequency {
    pub const fn ordered() -> [Self; 4] {
        [Self::Annual, Self::SemiAnnual, Self::Quarterly, Self::Monthly]
    }

    pub const fn payments_per_year(self) -> u32 {
        match self {
            Self::Annual => 1,
            Self::SemiAnnual => 2,
            Self::Quarterly => 4,
            Self::Monthly => 12,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Annual => "annual",
            Self::SemiAnnual => "semi-annual",
            Self::Quarterly => "quarterly",
            Self::Monthly => "monthly",
        }
    }
}

/// Product families available in the quote step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    WorkingCapital,
    EquipmentFinance,
    GreenInvestment,
    PropertyBridge,
}

impl ProductCategory {
    pub const fn label(self) -> &'static str {
        match self {
            Self::WorkingCapital => "Working Capital",
            Self::EquipmentFinance => "Equipment Finance",
            Self::GreenInvestment => "Green Investment",
            Self::PropertyBridge => "Property Bridge",
        }
    }
}

/// One requested credit product inside a quote or application.
///
/// Freely re-edited while a quote is open; edits recompute the derived
/// schedule. Immutable once the owning quote or agreement is finalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanItem {
    pub product: ProductCategory,
    pub principal: f64,
    pub annual_rate_percent: f64,
    pub term_months: u32,
    pub frequency: PaymentFrequency,
}

/// Derived repayment figures for a single loan item. Never stored on its
/// own; always recomputed from the latest item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepaymentSchedule {
    pub periodic_payment: f64,
    pub payment_count: u32,
    pub total_payments: f64,
    pub total_interest: f64,
}

impl RepaymentSchedule {
    /// Cash required per year to service this schedule.
    pub fn annual_debt_service(&self, frequency: PaymentFrequency) -> f64 {
        self.periodic_payment * frequency.payments_per_year() as f64
    }
}
