//! Vendor options discovered by search

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

use super::category::{Category, Dimension};
use crate::error::ValidationError;

/// Highest rating a vendor can carry
pub const MAX_RATING: f64 = 5.0;

/// One bookable vendor offer in a single category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorOption {
    /// Unique id within the catalog
    pub option_id: String,

    pub category: Category,

    /// Vendor/provider name
    pub vendor: String,

    #[serde(default)]
    pub title: String,

    /// Price per unit (seat, room-night, day, meal)
    pub unit_price: Decimal,

    /// Rooms available (hotels)
    #[serde(default)]
    pub rooms: Option<u32>,

    /// Seated capacity (meeting rooms)
    #[serde(default)]
    pub seats: Option<u32>,

    /// Rating out of 5
    #[serde(default)]
    pub rating: Option<f64>,

    #[serde(default)]
    pub review_count: Option<u32>,

    /// Address or area descriptor
    #[serde(default)]
    pub location: Option<String>,

    /// Proximity to the venue, 0 (far) to 1 (on site)
    #[serde(default)]
    pub location_score: Option<f64>,

    #[serde(default)]
    pub amenities: Vec<String>,

    #[serde(default)]
    pub equipment: Vec<String>,

    #[serde(default)]
    pub dietary_options: Vec<String>,

    /// Extra numeric signals (timing, comfort, service), higher is better
    #[serde(default)]
    pub signals: BTreeMap<Dimension, f64>,

    /// Source URL the option was found at
    #[serde(default)]
    pub source: Option<String>,
}

impl VendorOption {
    pub fn new(
        option_id: impl Into<String>,
        category: Category,
        vendor: impl Into<String>,
        unit_price: Decimal,
    ) -> Self {
        let vendor = vendor.into();
        Self {
            option_id: option_id.into(),
            category,
            title: vendor.clone(),
            vendor,
            unit_price,
            rooms: None,
            seats: None,
            rating: None,
            review_count: None,
            location: None,
            location_score: None,
            amenities: Vec::new(),
            equipment: Vec::new(),
            dietary_options: Vec::new(),
            signals: BTreeMap::new(),
            source: None,
        }
    }

    /// Builder method to set the rating
    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Builder method to set the room count
    pub fn with_rooms(mut self, rooms: u32) -> Self {
        self.rooms = Some(rooms);
        self
    }

    /// Builder method to set the seated capacity
    pub fn with_seats(mut self, seats: u32) -> Self {
        self.seats = Some(seats);
        self
    }

    /// Builder method to set the proximity signal
    pub fn with_location_score(mut self, score: f64) -> Self {
        self.location_score = Some(score);
        self
    }

    /// Builder method to set amenities
    pub fn with_amenities<S: Into<String>>(mut self, amenities: impl IntoIterator<Item = S>) -> Self {
        self.amenities = amenities.into_iter().map(Into::into).collect();
        self
    }

    /// Builder method to set an explicit signal
    pub fn with_signal(mut self, dimension: Dimension, value: f64) -> Self {
        self.signals.insert(dimension, value);
        self
    }

    /// Unit price as a float for scoring
    pub fn price_f64(&self) -> f64 {
        self.unit_price.to_f64().unwrap_or(0.0)
    }

    /// Capacity in the unit that matters for this category
    pub fn capacity(&self) -> Option<u32> {
        match self.category {
            Category::Hotels => self.rooms,
            _ => self.seats,
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let fail = |field: &str, reason: String| Err(ValidationError::for_option(&self.option_id, field, reason));

        if self.option_id.trim().is_empty() {
            return fail("option_id", "must not be empty".to_string());
        }
        if self.unit_price < Decimal::ZERO {
            return fail("unit_price", format!("negative price {}", self.unit_price));
        }
        if let Some(rating) = self.rating
            && !(0.0..=MAX_RATING).contains(&rating)
        {
            return fail("rating", format!("{} is outside 0..={}", rating, MAX_RATING));
        }
        if let Some(score) = self.location_score
            && !(0.0..=1.0).contains(&score)
        {
            return fail("location_score", format!("{} is outside 0..=1", score));
        }
        for (dimension, value) in &self.signals {
            if !value.is_finite() {
                return fail("signals", format!("{} signal is not a finite number", dimension));
            }
        }
        Ok(())
    }
}

/// All options returned by vendor search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptionsCatalog {
    pub options: Vec<VendorOption>,
}

impl OptionsCatalog {
    pub fn new(options: Vec<VendorOption>) -> Self {
        Self { options }
    }

    /// Check every option plus catalog-wide invariants
    pub fn validate(&self) -> Result<(), ValidationError> {
        debug!(count = self.options.len(), "OptionsCatalog::validate: called");
        if self.options.is_empty() {
            return Err(ValidationError::new("options", "catalog contains no options"));
        }

        let mut seen = HashSet::new();
        for option in &self.options {
            option.validate()?;
            if !seen.insert(option.option_id.as_str()) {
                return Err(ValidationError::for_option(
                    &option.option_id,
                    "option_id",
                    "duplicate option id",
                ));
            }
        }
        Ok(())
    }

    /// Options grouped by category
    pub fn by_category(&self) -> BTreeMap<Category, Vec<&VendorOption>> {
        let mut grouped: BTreeMap<Category, Vec<&VendorOption>> = BTreeMap::new();
        for option in &self.options {
            grouped.entry(option.category).or_default().push(option);
        }
        grouped
    }

    pub fn find(&self, option_id: &str) -> Option<&VendorOption> {
        self.options.iter().find(|o| o.option_id == option_id)
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}
