//! Ranked packages and their score breakdowns

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::catalog::VendorOption;
use super::category::{Category, Dimension};
use super::weights::WeightProfile;

/// Normalized score for one dimension of one option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionScore {
    pub dimension: Dimension,
    /// Raw signal the score was derived from
    pub raw: f64,
    /// Normalized score in [0, 1]
    pub score: f64,
    pub weight: f64,
}

/// One category's share of a package score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub category: Category,
    pub option_id: String,
    pub importance: f64,
    /// None when every sub-weight is zero
    pub score: Option<f64>,
    /// importance-normalized share of the package score
    pub contribution: f64,
    pub dimensions: Vec<DimensionScore>,
    /// Why this category did not count toward the package score
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excluded: Option<String>,
}

/// One option per required category with a computed score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    /// Derived from the selected option ids, stable across re-scoring
    pub package_id: String,
    /// 1-based position in the ranking
    pub rank: usize,
    /// Weighted score in [0, 1]
    pub score: f64,
    pub selections: BTreeMap<Category, VendorOption>,
    /// Cost of the package at requirement-derived quantities
    pub estimated_cost: Decimal,
    pub over_budget: bool,
    pub breakdown: Vec<CategoryBreakdown>,
    pub explanation: String,
}

impl Package {
    /// Build the id for a set of selections
    pub fn id_for<'a>(options: impl IntoIterator<Item = &'a VendorOption>) -> String {
        let ids: Vec<&str> = options.into_iter().map(|o| o.option_id.as_str()).collect();
        format!("pkg:{}", ids.join("+"))
    }

    pub fn selection(&self, category: Category) -> Option<&VendorOption> {
        self.selections.get(&category)
    }
}

/// Why a ranking carries no meaningful packages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A required category has no candidates in the catalog
    NoPackagesProducible { category: Category },
    /// No required category carries positive importance with defined scores
    NoMeaningfulRanking,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoPackagesProducible { category } => {
                write!(f, "no packages producible: no {} options were found", category)
            }
            Self::NoMeaningfulRanking => {
                write!(f, "no meaningful ranking: every required category has zero weight")
            }
        }
    }
}

/// Result of scoring a catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    /// Best first
    pub packages: Vec<Package>,
    pub weights_used: WeightProfile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<Diagnostic>,
    /// Packages scored before budget filtering and truncation
    pub considered: usize,
}

impl Ranking {
    pub fn top(&self) -> Option<&Package> {
        self.packages.first()
    }

    pub fn find(&self, package_id: &str) -> Option<&Package> {
        self.packages.iter().find(|p| p.package_id == package_id)
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// True when nothing fit the budget and the full set was returned flagged
    pub fn all_over_budget(&self) -> bool {
        !self.packages.is_empty() && self.packages.iter().all(|p| p.over_budget)
    }
}
