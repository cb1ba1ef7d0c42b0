//! Structured planning requirements

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

use super::category::Category;
use crate::error::ValidationError;

/// Largest group a single request can plan for
pub const MAX_ATTENDEES: u32 = 100_000;

/// Longest event, in days, a single request can span
pub const MAX_EVENT_DAYS: u32 = 366;

/// Canonical planning request, produced by a requirements extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requirements {
    /// Number of people travelling
    pub attendees: u32,

    /// Destination
    pub location: String,

    /// Departure city, if travel is needed
    #[serde(default)]
    pub origin: Option<String>,

    /// First day of the event
    pub start_date: NaiveDate,

    /// Last day of the event (inclusive)
    pub end_date: NaiveDate,

    /// Total budget for the whole package
    pub budget: Decimal,

    /// Categories every package must cover
    pub categories: BTreeSet<Category>,

    #[serde(default)]
    pub must_haves: Vec<String>,

    #[serde(default)]
    pub nice_to_haves: Vec<String>,

    /// Anything else the requester said
    #[serde(default)]
    pub notes: Option<String>,
}

impl Requirements {
    /// Check field constraints; the first violation wins
    pub fn validate(&self) -> Result<(), ValidationError> {
        debug!(attendees = self.attendees, location = %self.location, "Requirements::validate: called");
        if self.attendees == 0 {
            return Err(ValidationError::new("attendees", "must be a positive integer"));
        }
        if self.attendees > MAX_ATTENDEES {
            return Err(ValidationError::new(
                "attendees",
                format!("{} exceeds the limit of {}", self.attendees, MAX_ATTENDEES),
            ));
        }
        if self.location.trim().is_empty() {
            return Err(ValidationError::new("location", "must not be empty"));
        }
        if self.start_date > self.end_date {
            return Err(ValidationError::new(
                "end_date",
                format!("end date {} is before start date {}", self.end_date, self.start_date),
            ));
        }
        if (self.end_date - self.start_date).num_days() >= i64::from(MAX_EVENT_DAYS) {
            return Err(ValidationError::new(
                "end_date",
                format!("event spans more than {} days", MAX_EVENT_DAYS),
            ));
        }
        if self.budget < Decimal::ZERO {
            return Err(ValidationError::new("budget", "must not be negative"));
        }
        if self.categories.is_empty() {
            return Err(ValidationError::new("categories", "at least one category is required"));
        }
        Ok(())
    }

    /// Event length in days, counting both ends
    pub fn days(&self) -> u32 {
        let span = (self.end_date - self.start_date).num_days().max(0);
        u32::try_from(span).unwrap_or(u32::MAX).saturating_add(1)
    }

    /// Hotel nights; a single-day event still books one night
    pub fn nights(&self) -> u32 {
        self.days().saturating_sub(1).max(1)
    }

    pub fn requires(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// 50 attendees, two days in Las Vegas, $60k, every category
    pub fn retreat() -> Requirements {
        Requirements {
            attendees: 50,
            location: "Las Vegas".to_string(),
            origin: Some("San Francisco".to_string()),
            start_date: NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 3, 11).unwrap(),
            budget: Decimal::from(60_000),
            categories: Category::ALL.into_iter().collect(),
            must_haves: vec!["4-star hotel".to_string()],
            nice_to_haves: vec![],
            notes: None,
        }
    }
}
