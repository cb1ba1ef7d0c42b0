//! Retreat planner configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cart::{PricingConfig, QuantityPolicy};
use crate::domain::{WeightOverrides, WeightProfile};
use crate::scoring::ScoringConfig;

/// Main planner configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tax and fee schedule
    pub pricing: PricingConfig,

    /// Requirement-derived quantities
    pub quantities: QuantityPolicy,

    /// Package generation limits
    pub scoring: ScoringConfig,

    /// Adjustments applied to the default weight profile
    pub weights: WeightOverrides,

    /// Storage configuration
    pub storage: StorageConfig,

    /// Log level (trace, debug, info, warn, error)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,
}

impl Config {
    /// Validate configuration before use
    pub fn validate(&self) -> Result<()> {
        if !self.pricing.is_valid() {
            return Err(eyre::eyre!("Pricing rates and fees must not be negative"));
        }
        if self.quantities.occupancy_per_room == 0 {
            return Err(eyre::eyre!("quantities.occupancy-per-room must be at least 1"));
        }
        if self.scoring.max_options_per_category == 0 || self.scoring.max_packages == 0 {
            return Err(eyre::eyre!("Scoring limits must be at least 1"));
        }
        self.weight_profile()
            .validate()
            .map_err(|e| eyre::eyre!("Invalid weights in config: {}", e))?;
        Ok(())
    }

    /// The default weight profile with configured overrides applied
    pub fn weight_profile(&self) -> WeightProfile {
        WeightProfile::default().apply(&self.weights)
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .retreatplan.yml
        let local_config = PathBuf::from(".retreatplan.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/retreatplan/retreatplan.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("retreatplan").join("retreatplan.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is set up
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        Self::load(config_path).ok().and_then(|c| c.log_level)
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory for persisted sessions
    #[serde(rename = "session-dir")]
    pub session_dir: String,

    /// Keep sessions in memory only
    #[serde(rename = "in-memory")]
    pub in_memory: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        // Use XDG data directory (~/.local/share/retreatplan on Linux)
        let session_dir = dirs::data_dir()
            .map(|d| d.join("retreatplan").join("sessions"))
            .unwrap_or_else(|| PathBuf::from(".retreatplan-sessions"))
            .to_string_lossy()
            .into_owned();

        Self {
            session_dir,
            in_memory: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Category;
    use rust_decimal::Decimal;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.pricing.tax_rate, Decimal::new(875, 4));
        assert_eq!(config.quantities.occupancy_per_room, 2);
        assert_eq!(config.scoring.max_options_per_category, 8);
        assert_eq!(config.scoring.max_packages, 50);
        assert!(config.weights.is_empty());
        assert!(config.storage.session_dir.ends_with("sessions"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
pricing:
  tax-rate: 0.08
  service-fee-rate: 0
  flat-fee: 25

quantities:
  occupancy-per-room: 1
  meals-per-day: 3

scoring:
  max-options-per-category: 4
  max-packages: 10

weights:
  category_importance:
    hotels: 45
  hotels:
    trust_weight: 50

storage:
  in-memory: true

log-level: debug
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.pricing.tax_rate, Decimal::new(8, 2));
        assert_eq!(config.pricing.flat_fee, Decimal::from(25));
        assert_eq!(config.quantities.meals_per_day, 3);
        assert_eq!(config.scoring.max_packages, 10);
        assert!(config.storage.in_memory);
        assert_eq!(config.log_level.as_deref(), Some("debug"));

        let profile = config.weight_profile();
        assert_eq!(profile.importance(Category::Hotels), 45.0);
        assert_eq!(profile.hotels.trust_weight, 50.0);
        assert_eq!(profile.importance(Category::Flights), 30.0);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
scoring:
  max-packages: 5
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        // Specified value
        assert_eq!(config.scoring.max_packages, 5);

        // Defaults for unspecified
        assert_eq!(config.scoring.max_options_per_category, 8);
        assert_eq!(config.pricing.service_fee_rate, Decimal::new(25, 3));
        assert_eq!(config.quantities.meals_per_day, 1);
    }

    #[test]
    fn test_validate_rejects_negative_rates() {
        let mut config = Config::default();
        config.pricing.tax_rate = Decimal::from(-1);
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.weights.category_importance = Some([(Category::Catering, -5.0)].into_iter().collect());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_explicit_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("planner.yml");
        fs::write(&path, "log-level: warn\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.log_level.as_deref(), Some("warn"));
        assert_eq!(Config::load_log_level(Some(&path)).as_deref(), Some("warn"));

        let missing = temp.path().join("missing.yml");
        assert!(Config::load(Some(&missing)).is_err());
    }
}
