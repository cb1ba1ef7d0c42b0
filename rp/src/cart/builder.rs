//! Cart construction, modification and pricing

use rust_decimal::Decimal;
use sessionstore::{generate_id, now_ms};
use tracing::{debug, info};

use super::model::{Cart, CartModification, CartState, LineItem};
use super::pricing::PricingConfig;
use super::quantity::QuantityPolicy;
use super::CartError;
use crate::domain::{Category, OptionsCatalog, Package, Requirements, VendorOption};

/// Builds and modifies carts under one pricing and quantity policy
#[derive(Debug, Clone, Default)]
pub struct CartBuilder {
    pricing: PricingConfig,
    quantities: QuantityPolicy,
}

impl CartBuilder {
    pub fn new(pricing: PricingConfig, quantities: QuantityPolicy) -> Self {
        Self { pricing, quantities }
    }

    pub fn pricing(&self) -> &PricingConfig {
        &self.pricing
    }

    pub fn quantities(&self) -> &QuantityPolicy {
        &self.quantities
    }

    /// Materialize a package into one line per selected option
    pub fn build(&self, package: &Package, requirements: &Requirements) -> Result<Cart, CartError> {
        debug!(package_id = %package.package_id, "build: called");
        let mut cart = self.empty_cart();
        cart.package_id = Some(package.package_id.clone());

        for (category, option) in &package.selections {
            let quantity = self.quantities.quantity_for(*category, requirements);
            let line_id = cart.allocate_line_id();
            cart.lines.push(LineItem::new(line_id, option.clone(), quantity));
        }

        cart.state = CartState::Built;
        self.recompute(&mut cart)?;
        info!(
            cart_id = %cart.cart_id,
            lines = cart.lines.len(),
            total = %cart.total,
            "Built cart"
        );
        Ok(cart)
    }

    /// Assemble a cart from explicit options and quantities
    pub fn from_lines(&self, lines: Vec<(VendorOption, u32)>) -> Result<Cart, CartError> {
        debug!(count = lines.len(), "from_lines: called");
        let mut cart = self.empty_cart();
        for (option, quantity) in lines {
            if quantity == 0 {
                return Err(CartError::ConstraintViolation {
                    reason: format!("option {} has zero quantity", option.option_id),
                });
            }
            let line_id = cart.allocate_line_id();
            cart.lines.push(LineItem::new(line_id, option, quantity));
        }
        if !cart.lines.is_empty() {
            cart.state = CartState::Built;
        }
        self.recompute(&mut cart)?;
        Ok(cart)
    }

    /// Apply one modification, returning the updated cart
    ///
    /// The input cart is never touched; on error the caller still holds the
    /// unchanged original.
    pub fn modify(
        &self,
        cart: &Cart,
        modification: &CartModification,
        catalog: &OptionsCatalog,
        requirements: &Requirements,
    ) -> Result<Cart, CartError> {
        debug!(cart_id = %cart.cart_id, modification = %modification.describe(), "modify: called");
        if cart.is_finalized() {
            return Err(CartError::ConstraintViolation {
                reason: "cart is finalized".to_string(),
            });
        }

        let mut next = cart.clone();
        match modification {
            CartModification::AddLineItem { option_id, quantity } => {
                let option = lookup(catalog, option_id)?;
                let quantity = quantity.unwrap_or_else(|| self.quantities.quantity_for(option.category, requirements));
                let line_id = next.allocate_line_id();
                next.lines.push(LineItem::new(line_id, option.clone(), quantity));
            }
            CartModification::RemoveLineItem { line_id } => {
                let idx = line_index(&next, line_id)?;
                next.lines.remove(idx);
            }
            CartModification::ChangeQuantity { line_id, quantity } => {
                let idx = line_index(&next, line_id)?;
                next.lines[idx].quantity = *quantity;
            }
            CartModification::SwapOption { line_id, option_id } => {
                let idx = line_index(&next, line_id)?;
                let option = lookup(catalog, option_id)?;
                let line = &mut next.lines[idx];
                if option.category != line.category {
                    return Err(CartError::ConstraintViolation {
                        reason: format!(
                            "cannot swap {} line {} for {} option {}",
                            line.category, line_id, option.category, option_id
                        ),
                    });
                }
                line.option = option.clone();
            }
        }

        self.check_constraints(cart, &next, requirements)?;
        next.state = CartState::Modified;
        self.recompute(&mut next)?;
        Ok(next)
    }

    /// Mark a cart confirmed
    pub fn finalize(&self, cart: &Cart) -> Result<Cart, CartError> {
        debug!(cart_id = %cart.cart_id, state = %cart.state, "finalize: called");
        match cart.state {
            CartState::Built | CartState::Modified => {
                let mut done = cart.clone();
                done.state = CartState::Finalized;
                done.updated_at = now_ms();
                Ok(done)
            }
            other => Err(CartError::ConstraintViolation {
                reason: format!("cannot finalize a cart in state {}", other),
            }),
        }
    }

    fn empty_cart(&self) -> Cart {
        let now = now_ms();
        Cart {
            cart_id: generate_id("cart"),
            package_id: None,
            state: CartState::Empty,
            lines: Vec::new(),
            subtotal: Decimal::ZERO,
            tax: Decimal::ZERO,
            fees: Decimal::ZERO,
            total: Decimal::ZERO,
            next_line: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Reprice every line and refresh the totals
    ///
    /// Fails without touching the totals when any amount overflows.
    fn recompute(&self, cart: &mut Cart) -> Result<(), CartError> {
        let overflow = || CartError::ConstraintViolation {
            reason: "cart amounts exceed the largest representable total".to_string(),
        };

        let mut subtotal = Decimal::ZERO;
        for line in &mut cart.lines {
            let line_total = line.reprice().ok_or_else(overflow)?;
            subtotal = subtotal.checked_add(line_total).ok_or_else(overflow)?;
        }
        let tax = self.pricing.tax(subtotal).ok_or_else(overflow)?;
        let fees = self.pricing.fees(subtotal).ok_or_else(overflow)?;
        let total = subtotal
            .checked_add(tax)
            .and_then(|t| t.checked_add(fees))
            .ok_or_else(overflow)?;

        cart.subtotal = subtotal;
        cart.tax = tax;
        cart.fees = fees;
        cart.total = total;
        cart.updated_at = now_ms();
        Ok(())
    }

    fn check_constraints(&self, before: &Cart, after: &Cart, requirements: &Requirements) -> Result<(), CartError> {
        let violation = |reason: String| Err(CartError::ConstraintViolation { reason });

        if let Some(line) = after.lines.iter().find(|l| l.quantity == 0) {
            return violation(format!("line {} has zero quantity", line.line_id));
        }

        for category in &requirements.categories {
            if before.lines_in(*category).next().is_some() && after.lines_in(*category).next().is_none() {
                return violation(format!("required category {} would have no line item", category));
            }
        }

        for category in [Category::Hotels, Category::MeetingRooms] {
            if !requirements.requires(category) {
                continue;
            }
            let need = self.quantities.capacity_needed(category, requirements);
            let Some(after_cap) = capacity(after, category) else {
                continue;
            };
            let reduced = capacity(before, category).is_none_or(|b| after_cap < b);
            if after_cap < need && reduced {
                let unit = if category == Category::Hotels { "rooms" } else { "seats" };
                return violation(format!(
                    "{} would provide {} {} but {} are needed",
                    category, after_cap, unit, need
                ));
            }
        }
        Ok(())
    }
}

/// Total capacity of a category's lines; None when any line lacks the attribute
fn capacity(cart: &Cart, category: Category) -> Option<u32> {
    let mut total = 0u32;
    let mut any = false;
    for line in cart.lines_in(category) {
        total = total.saturating_add(line.option.capacity()?);
        any = true;
    }
    any.then_some(total)
}

fn line_index(cart: &Cart, line_id: &str) -> Result<usize, CartError> {
    cart.lines
        .iter()
        .position(|l| l.line_id == line_id)
        .ok_or_else(|| CartError::InvalidLineItem {
            line_id: line_id.to_string(),
        })
}

fn lookup<'a>(catalog: &'a OptionsCatalog, option_id: &str) -> Result<&'a VendorOption, CartError> {
    catalog.find(option_id).ok_or_else(|| CartError::UnknownOption {
        option_id: option_id.to_string(),
    })
}
