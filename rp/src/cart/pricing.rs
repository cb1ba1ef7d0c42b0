//! Tax and fee schedule

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Rates applied on top of a cart subtotal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Fraction of subtotal charged as tax
    #[serde(rename = "tax-rate")]
    pub tax_rate: Decimal,

    /// Fraction of subtotal charged as a service fee
    #[serde(rename = "service-fee-rate")]
    pub service_fee_rate: Decimal,

    /// Fixed fee per cart
    #[serde(rename = "flat-fee")]
    pub flat_fee: Decimal,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            tax_rate: Decimal::new(875, 4),
            service_fee_rate: Decimal::new(25, 3),
            flat_fee: Decimal::ZERO,
        }
    }
}

impl PricingConfig {
    /// Tax on a subtotal, rounded to cents; None on overflow
    pub fn tax(&self, subtotal: Decimal) -> Option<Decimal> {
        subtotal.checked_mul(self.tax_rate).map(round_cents)
    }

    /// Flat fee plus percentage fee, rounded to cents; None on overflow
    pub fn fees(&self, subtotal: Decimal) -> Option<Decimal> {
        let rated = subtotal.checked_mul(self.service_fee_rate).map(round_cents)?;
        self.flat_fee.checked_add(rated)
    }

    pub fn is_valid(&self) -> bool {
        self.tax_rate >= Decimal::ZERO && self.service_fee_rate >= Decimal::ZERO && self.flat_fee >= Decimal::ZERO
    }
}

/// Round to two places, halves away from zero
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
