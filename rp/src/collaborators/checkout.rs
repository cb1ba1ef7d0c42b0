//! Checkout request model and a simulated provider

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sessionstore::now_ms;
use tracing::{debug, info};
use uuid::Uuid;

use super::{CheckoutProvider, CollaboratorError};
use crate::cart::Cart;
use crate::domain::{Category, Confirmation, VendorConfirmation};

/// Who the bookings are for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
}

/// How the booking is paid for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Card,
    Invoice,
    PurchaseOrder { po_number: String },
}

/// Checkout input supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub contact: ContactDetails,
    #[serde(default)]
    pub payment: PaymentMethod,
    #[serde(default)]
    pub special_requests: Option<String>,
    #[serde(default)]
    pub terms_accepted: bool,
}

impl CheckoutRequest {
    /// Reject requests no vendor would accept
    pub fn validate(&self) -> Result<(), CollaboratorError> {
        if self.contact.name.trim().is_empty() {
            return Err(CollaboratorError::Rejected("contact name is required".to_string()));
        }
        let email = self.contact.email.trim();
        if email.is_empty() {
            return Err(CollaboratorError::Rejected("contact email is required".to_string()));
        }
        if !email.contains('@') || !email.contains('.') {
            return Err(CollaboratorError::Rejected(format!("invalid email {}", email)));
        }
        if !self.terms_accepted {
            return Err(CollaboratorError::Rejected(
                "terms and conditions must be accepted".to_string(),
            ));
        }
        if let PaymentMethod::PurchaseOrder { po_number } = &self.payment
            && po_number.trim().is_empty()
        {
            return Err(CollaboratorError::Rejected(
                "purchase order number is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Random uppercase hex of the given length
fn token(len: usize) -> String {
    let hex = Uuid::now_v7().simple().to_string().to_uppercase();
    hex[hex.len() - len.min(hex.len())..].to_string()
}

fn confirmation_prefix(category: Category) -> &'static str {
    match category {
        Category::Flights => "FLT",
        Category::Hotels => "HTL",
        Category::MeetingRooms => "MTG",
        Category::Catering => "CTR",
    }
}

/// Checkout that confirms every line without contacting vendors
#[derive(Debug, Clone, Default)]
pub struct SimulatedCheckout;

#[async_trait]
impl CheckoutProvider for SimulatedCheckout {
    async fn checkout(&self, cart: &Cart, request: &CheckoutRequest) -> Result<Confirmation, CollaboratorError> {
        debug!(cart_id = %cart.cart_id, lines = cart.lines.len(), "SimulatedCheckout::checkout: called");
        request.validate()?;
        if cart.lines.is_empty() {
            return Err(CollaboratorError::Rejected("cart has no line items".to_string()));
        }

        let payment_reference = match &request.payment {
            PaymentMethod::Card => format!("ch_{}", token(16).to_lowercase()),
            PaymentMethod::Invoice => format!("inv_{}", token(8)),
            PaymentMethod::PurchaseOrder { po_number } => format!("po_{}", po_number.trim()),
        };

        let vendor_confirmations = cart
            .lines
            .iter()
            .map(|line| VendorConfirmation {
                line_id: line.line_id.clone(),
                category: line.category,
                vendor: line.option.vendor.clone(),
                confirmation_code: format!("{}-{}", confirmation_prefix(line.category), token(6)),
                amount: line.line_total,
            })
            .collect();

        let confirmation = Confirmation {
            booking_id: format!("RTR-{}", token(8)),
            vendor_confirmations,
            total_charged: cart.total,
            payment_reference: Some(payment_reference),
            confirmed_at: now_ms(),
        };
        info!(booking_id = %confirmation.booking_id, total = %cart.total, "Checkout confirmed");
        Ok(confirmation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartBuilder;
    use crate::domain::VendorOption;
    use rust_decimal::Decimal;

    fn request() -> CheckoutRequest {
        CheckoutRequest {
            contact: ContactDetails {
                name: "Dana Ortiz".to_string(),
                email: "dana@example.com".to_string(),
                phone: None,
                company: Some("Acme".to_string()),
            },
            payment: PaymentMethod::Invoice,
            special_requests: None,
            terms_accepted: true,
        }
    }

    fn cart() -> Cart {
        CartBuilder::default()
            .from_lines(vec![
                (VendorOption::new("h1", Category::Hotels, "Inn", Decimal::from(150)), 4),
                (VendorOption::new("c1", Category::Catering, "Chef", Decimal::from(40)), 50),
            ])
            .unwrap()
    }

    #[tokio::test]
    async fn test_simulated_checkout_confirms_each_line() {
        let cart = cart();
        let confirmation = SimulatedCheckout.checkout(&cart, &request()).await.unwrap();

        assert!(confirmation.booking_id.starts_with("RTR-"));
        assert_eq!(confirmation.booking_id.len(), 12);
        assert_eq!(confirmation.total_charged, cart.total);
        assert_eq!(confirmation.vendor_confirmations.len(), 2);
        assert!(confirmation.vendor_confirmations[0].confirmation_code.starts_with("HTL-"));
        assert!(confirmation.vendor_confirmations[1].confirmation_code.starts_with("CTR-"));
        assert!(confirmation.payment_reference.unwrap().starts_with("inv_"));
    }

    #[tokio::test]
    async fn test_terms_must_be_accepted() {
        let mut req = request();
        req.terms_accepted = false;
        let err = SimulatedCheckout.checkout(&cart(), &req).await.unwrap_err();
        assert!(matches!(err, CollaboratorError::Rejected(_)));
    }

    #[test]
    fn test_request_validation() {
        let mut req = request();
        req.contact.email = "not-an-email".to_string();
        assert!(req.validate().is_err());

        let mut req = request();
        req.payment = PaymentMethod::PurchaseOrder {
            po_number: " ".to_string(),
        };
        assert!(req.validate().is_err());

        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_request_wire_format() {
        let req: CheckoutRequest = serde_yaml::from_str(
            "contact:\n  name: Dana\n  email: dana@example.com\npayment:\n  method: purchase_order\n  po_number: PO-7\nterms_accepted: true\n",
        )
        .unwrap();
        assert_eq!(
            req.payment,
            PaymentMethod::PurchaseOrder {
                po_number: "PO-7".to_string()
            }
        );
    }
}
