//! Weighted multi-criteria scoring of vendor packages
//!
//! Each required category's options are scored per dimension by min-max
//! normalization, combined by sub-weights, and trimmed to the best few. Every
//! combination of one option per category then becomes a [`Package`] scored
//! by category importance.
//!
//! [`Package`]: crate::domain::Package

mod engine;
mod normalize;

pub use engine::ScoringEngine;
pub use normalize::{normalize, raw_signal};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ValidationError;

/// Errors from scoring
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoringError {
    #[error("Invalid weights: {0}")]
    InvalidWeights(ValidationError),
}

/// Limits on package generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Best options kept per category before combining
    #[serde(rename = "max-options-per-category")]
    pub max_options_per_category: usize,

    /// Packages kept after sorting
    #[serde(rename = "max-packages")]
    pub max_packages: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            max_options_per_category: 8,
            max_packages: 50,
        }
    }
}
