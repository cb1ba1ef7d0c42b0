//! Cart assembly and pricing
//!
//! A [`CartBuilder`] turns a ranked package into priced line items and applies
//! modifications. Every change recomputes subtotal, tax, fees and total.

mod builder;
mod model;
mod pricing;
mod quantity;

pub use builder::CartBuilder;
pub use model::{Cart, CartModification, CartState, LineItem};
pub use pricing::{PricingConfig, round_cents};
pub use quantity::QuantityPolicy;

use thiserror::Error;

/// Errors from cart operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("Line item not found: {line_id}")]
    InvalidLineItem { line_id: String },

    #[error("Option not found in catalog: {option_id}")]
    UnknownOption { option_id: String },

    #[error("Constraint violation: {reason}")]
    ConstraintViolation { reason: String },
}
