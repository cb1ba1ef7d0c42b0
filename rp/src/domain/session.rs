//! Planning session: the unit of pipeline state

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sessionstore::{Record, generate_id, now_ms};
use std::fmt;
use tracing::debug;

use super::catalog::OptionsCatalog;
use super::category::Category;
use super::package::Ranking;
use super::requirements::Requirements;
use crate::cart::Cart;

/// Pipeline stage, totally ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Session exists, nothing analyzed yet
    #[default]
    Created,
    RequirementsAnalyzed,
    OptionsDiscovered,
    PackagesRanked,
    CartBuilt,
    CheckedOut,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::Created,
        Stage::RequirementsAnalyzed,
        Stage::OptionsDiscovered,
        Stage::PackagesRanked,
        Stage::CartBuilt,
        Stage::CheckedOut,
    ];

    /// The stage a session must be at for this stage to run
    pub fn prerequisite(&self) -> Option<Stage> {
        let idx = Self::ALL.iter().position(|s| s == self)?;
        idx.checked_sub(1).map(|i| Self::ALL[i])
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::RequirementsAnalyzed => "requirements_analyzed",
            Self::OptionsDiscovered => "options_discovered",
            Self::PackagesRanked => "packages_ranked",
            Self::CartBuilt => "cart_built",
            Self::CheckedOut => "checked_out",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Booking confirmation for one vendor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorConfirmation {
    pub line_id: String,
    pub category: Category,
    pub vendor: String,
    pub confirmation_code: String,
    pub amount: Decimal,
}

/// Result handed back by the checkout collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Confirmation {
    pub booking_id: String,
    pub vendor_confirmations: Vec<VendorConfirmation>,
    pub total_charged: Decimal,
    #[serde(default)]
    pub payment_reference: Option<String>,
    /// Unix milliseconds
    pub confirmed_at: i64,
}

/// Per-session pipeline state
///
/// Each optional field is set exactly when `stage` has reached the step that
/// produces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub stage: Stage,
    #[serde(default)]
    pub requirements: Option<Requirements>,
    #[serde(default)]
    pub catalog: Option<OptionsCatalog>,
    #[serde(default)]
    pub ranking: Option<Ranking>,
    #[serde(default)]
    pub cart: Option<Cart>,
    #[serde(default)]
    pub confirmation: Option<Confirmation>,
    /// Bumped on every committed write
    pub revision: u64,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,
    /// Last update timestamp (Unix milliseconds)
    pub updated_at: i64,
}

impl Session {
    /// Create a new session with a generated id
    pub fn new() -> Self {
        Self::with_id(generate_id("sess"))
    }

    /// Create with a specific id (for testing or recovery)
    pub fn with_id(id: impl Into<String>) -> Self {
        let id = id.into();
        debug!(%id, "Session::with_id: called");
        let now = now_ms();
        Self {
            id,
            stage: Stage::Created,
            requirements: None,
            catalog: None,
            ranking: None,
            cart: None,
            confirmation: None,
            revision: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Mark a committed write
    pub fn touch(&mut self) {
        self.revision += 1;
        self.updated_at = now_ms();
    }

    /// Whether the populated fields agree with the stage
    pub fn is_consistent(&self) -> bool {
        let reached = |stage: Stage| self.stage >= stage;
        self.requirements.is_some() == reached(Stage::RequirementsAnalyzed)
            && self.catalog.is_some() == reached(Stage::OptionsDiscovered)
            && self.ranking.is_some() == reached(Stage::PackagesRanked)
            && self.cart.is_some() == reached(Stage::CartBuilt)
            && self.confirmation.is_some() == reached(Stage::CheckedOut)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Record for Session {
    fn id(&self) -> &str {
        &self.id
    }

    fn updated_at(&self) -> i64 {
        self.updated_at
    }

    fn collection_name() -> &'static str {
        "sessions"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order_is_total() {
        for pair in Stage::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
            assert_eq!(pair[1].prerequisite(), Some(pair[0]));
        }
        assert_eq!(Stage::Created.prerequisite(), None);
    }

    #[test]
    fn test_new_session_is_consistent() {
        let session = Session::new();
        assert!(session.id.starts_with("sess-"));
        assert_eq!(session.stage, Stage::Created);
        assert!(session.is_consistent());
    }

    #[test]
    fn test_stage_without_data_is_inconsistent() {
        let mut session = Session::with_id("s1");
        session.stage = Stage::RequirementsAnalyzed;
        assert!(!session.is_consistent());
    }

    #[test]
    fn test_touch_bumps_revision() {
        let mut session = Session::with_id("s1");
        session.touch();
        session.touch();
        assert_eq!(session.revision, 2);
    }

    #[test]
    fn test_stage_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&Stage::PackagesRanked).unwrap(),
            "\"packages_ranked\""
        );
    }
}
