//! Cart and line item records

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::{Category, VendorOption};

/// Cart lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CartState {
    #[default]
    Empty,
    Built,
    Modified,
    /// Confirmed by checkout; no further changes
    Finalized,
}

impl fmt::Display for CartState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Empty => "empty",
            Self::Built => "built",
            Self::Modified => "modified",
            Self::Finalized => "finalized",
        };
        f.pad(s)
    }
}

/// One priced, quantified selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub line_id: String,
    pub category: Category,
    pub option: VendorOption,
    pub quantity: u32,
    pub unit_price: Decimal,
    /// unit_price x quantity
    pub line_total: Decimal,
}

impl LineItem {
    pub fn new(line_id: impl Into<String>, option: VendorOption, quantity: u32) -> Self {
        let unit_price = option.unit_price;
        Self {
            line_id: line_id.into(),
            category: option.category,
            option,
            quantity,
            unit_price,
            line_total: unit_price.saturating_mul(Decimal::from(quantity)),
        }
    }

    /// Refresh price and total from the option; None if the total overflows
    pub(crate) fn reprice(&mut self) -> Option<Decimal> {
        self.unit_price = self.option.unit_price;
        self.line_total = self.unit_price.checked_mul(Decimal::from(self.quantity))?;
        Some(self.line_total)
    }
}

/// Priced selection of vendor options
///
/// `total` always equals `subtotal + tax + fees`; every mutation goes through
/// [`super::CartBuilder`], which recomputes all four.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    pub cart_id: String,
    /// Package the cart was built from, if any
    #[serde(default)]
    pub package_id: Option<String>,
    pub state: CartState,
    pub lines: Vec<LineItem>,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub fees: Decimal,
    pub total: Decimal,
    /// Sequence for the next generated line id
    pub next_line: u32,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Cart {
    pub fn line(&self, line_id: &str) -> Option<&LineItem> {
        self.lines.iter().find(|l| l.line_id == line_id)
    }

    pub fn lines_in(&self, category: Category) -> impl Iterator<Item = &LineItem> {
        self.lines.iter().filter(move |l| l.category == category)
    }

    pub fn is_finalized(&self) -> bool {
        self.state == CartState::Finalized
    }

    /// total == subtotal + tax + fees and subtotal == sum of line totals
    pub fn is_balanced(&self) -> bool {
        let sum: Decimal = self.lines.iter().map(|l| l.line_total).sum();
        sum == self.subtotal && self.total == self.subtotal + self.tax + self.fees
    }

    pub(crate) fn allocate_line_id(&mut self) -> String {
        self.next_line += 1;
        format!("line-{}", self.next_line)
    }
}

/// A requested change to a built cart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum CartModification {
    /// Add a catalog option; quantity defaults from requirements
    AddLineItem {
        option_id: String,
        #[serde(default)]
        quantity: Option<u32>,
    },
    RemoveLineItem {
        line_id: String,
    },
    ChangeQuantity {
        line_id: String,
        quantity: u32,
    },
    /// Replace a line's option with another in the same category
    SwapOption {
        line_id: String,
        option_id: String,
    },
}

impl CartModification {
    pub fn describe(&self) -> String {
        match self {
            Self::AddLineItem { option_id, .. } => format!("add {}", option_id),
            Self::RemoveLineItem { line_id } => format!("remove {}", line_id),
            Self::ChangeQuantity { line_id, quantity } => format!("set {} quantity to {}", line_id, quantity),
            Self::SwapOption { line_id, option_id } => format!("swap {} to {}", line_id, option_id),
        }
    }
}
