//! External collaborators the pipeline consumes
//!
//! Requirement extraction, vendor search and checkout live outside the core.
//! The pipeline only calls these traits and validates what comes back.

mod checkout;
mod files;

pub use checkout::{CheckoutRequest, ContactDetails, PaymentMethod, SimulatedCheckout};
pub use files::{StaticCatalog, StructuredExtractor, load_catalog, load_requirements};

use async_trait::async_trait;
use thiserror::Error;

use crate::cart::Cart;
use crate::domain::{Confirmation, OptionsCatalog, Requirements};

/// Errors raised by collaborator implementations
#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("Unavailable: {0}")]
    Unavailable(String),

    #[error("Rejected: {0}")]
    Rejected(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Turns a free-text request into structured requirements
#[async_trait]
pub trait RequirementsExtractor: Send + Sync {
    async fn extract(&self, text: &str) -> Result<Requirements, CollaboratorError>;
}

/// Finds vendor options for a set of requirements
#[async_trait]
pub trait VendorSearch: Send + Sync {
    async fn search(&self, requirements: &Requirements) -> Result<OptionsCatalog, CollaboratorError>;
}

/// Places bookings for a cart
#[async_trait]
pub trait CheckoutProvider: Send + Sync {
    async fn checkout(&self, cart: &Cart, request: &CheckoutRequest) -> Result<Confirmation, CollaboratorError>;
}
