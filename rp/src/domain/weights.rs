//! Scoring weight configuration
//!
//! [`WeightProfile`] is the fully resolved form the scoring engine consumes.
//! [`WeightOverrides`] mirrors it with every field optional and is what callers
//! and config files supply; it is overlaid onto a base profile.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::category::{Category, Dimension};
use crate::error::ValidationError;

/// Sub-criterion weights within one category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryWeights {
    pub price_weight: f64,
    pub trust_weight: f64,
    pub location_weight: f64,
    pub amenities_weight: f64,
    pub capacity_weight: f64,
    pub equipment_weight: f64,
    pub dietary_weight: f64,
    pub timing_weight: f64,
    pub comfort_weight: f64,
    pub service_weight: f64,
}

impl CategoryWeights {
    pub fn flights_default() -> Self {
        Self {
            price_weight: 50.0,
            timing_weight: 25.0,
            trust_weight: 15.0,
            comfort_weight: 10.0,
            ..Default::default()
        }
    }

    pub fn hotels_default() -> Self {
        Self {
            price_weight: 20.0,
            trust_weight: 40.0,
            location_weight: 25.0,
            amenities_weight: 15.0,
            ..Default::default()
        }
    }

    pub fn meeting_rooms_default() -> Self {
        Self {
            price_weight: 25.0,
            capacity_weight: 35.0,
            equipment_weight: 25.0,
            trust_weight: 15.0,
            ..Default::default()
        }
    }

    pub fn catering_default() -> Self {
        Self {
            price_weight: 30.0,
            trust_weight: 30.0,
            dietary_weight: 25.0,
            service_weight: 15.0,
            ..Default::default()
        }
    }

    pub fn weight(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Price => self.price_weight,
            Dimension::Trust => self.trust_weight,
            Dimension::Location => self.location_weight,
            Dimension::Amenities => self.amenities_weight,
            Dimension::Capacity => self.capacity_weight,
            Dimension::Equipment => self.equipment_weight,
            Dimension::Dietary => self.dietary_weight,
            Dimension::Timing => self.timing_weight,
            Dimension::Comfort => self.comfort_weight,
            Dimension::Service => self.service_weight,
        }
    }

    /// Dimensions with a positive weight, in declaration order
    pub fn active(&self) -> Vec<(Dimension, f64)> {
        Dimension::ALL
            .iter()
            .map(|d| (*d, self.weight(*d)))
            .filter(|(_, w)| *w > 0.0)
            .collect()
    }

    pub fn total(&self) -> f64 {
        Dimension::ALL.iter().map(|d| self.weight(*d)).sum()
    }

    fn validate(&self, category: Category) -> Result<(), ValidationError> {
        for dimension in Dimension::ALL {
            let w = self.weight(dimension);
            if !w.is_finite() || w < 0.0 {
                return Err(ValidationError::new(
                    format!("{}.{}_weight", category, dimension),
                    format!("must be a non-negative number, got {}", w),
                ));
            }
        }
        Ok(())
    }
}

/// Relative importance of categories plus per-category sub-weights
///
/// Weights are relative; scoring normalizes them, so they need not sum to 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightProfile {
    /// Missing categories have zero importance
    pub category_importance: BTreeMap<Category, f64>,
    pub flights: CategoryWeights,
    pub hotels: CategoryWeights,
    pub meeting_rooms: CategoryWeights,
    pub catering: CategoryWeights,
}

impl Default for WeightProfile {
    fn default() -> Self {
        Self {
            category_importance: BTreeMap::from([
                (Category::Flights, 30.0),
                (Category::Hotels, 40.0),
                (Category::MeetingRooms, 15.0),
                (Category::Catering, 15.0),
            ]),
            flights: CategoryWeights::flights_default(),
            hotels: CategoryWeights::hotels_default(),
            meeting_rooms: CategoryWeights::meeting_rooms_default(),
            catering: CategoryWeights::catering_default(),
        }
    }
}

impl WeightProfile {
    pub fn importance(&self, category: Category) -> f64 {
        self.category_importance.get(&category).copied().unwrap_or(0.0)
    }

    pub fn sub_weights(&self, category: Category) -> &CategoryWeights {
        match category {
            Category::Flights => &self.flights,
            Category::Hotels => &self.hotels,
            Category::MeetingRooms => &self.meeting_rooms,
            Category::Catering => &self.catering,
        }
    }

    fn sub_weights_mut(&mut self, category: Category) -> &mut CategoryWeights {
        match category {
            Category::Flights => &mut self.flights,
            Category::Hotels => &mut self.hotels,
            Category::MeetingRooms => &mut self.meeting_rooms,
            Category::Catering => &mut self.catering,
        }
    }

    /// Builder method to set one category's importance
    pub fn with_importance(mut self, category: Category, weight: f64) -> Self {
        self.category_importance.insert(category, weight);
        self
    }

    /// Overlay overrides onto this profile, returning the merged profile
    pub fn apply(&self, overrides: &WeightOverrides) -> Self {
        let mut merged = self.clone();
        if let Some(importance) = &overrides.category_importance {
            for (category, weight) in importance {
                merged.category_importance.insert(*category, *weight);
            }
        }
        for category in Category::ALL {
            if let Some(sub) = overrides.sub_weights(category) {
                sub.apply_to(merged.sub_weights_mut(category));
            }
        }
        merged
    }

    /// Reject negative or non-finite weights
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (category, weight) in &self.category_importance {
            if !weight.is_finite() || *weight < 0.0 {
                return Err(ValidationError::new(
                    format!("category_importance.{}", category),
                    format!("must be a non-negative number, got {}", weight),
                ));
            }
        }
        for category in Category::ALL {
            self.sub_weights(category).validate(category)?;
        }
        Ok(())
    }
}

/// Partial sub-weights; unset fields keep the base value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryWeightOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trust_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amenities_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equipment_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dietary_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timing_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comfort_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_weight: Option<f64>,
}

impl CategoryWeightOverrides {
    fn apply_to(&self, target: &mut CategoryWeights) {
        let pairs = [
            (self.price_weight, &mut target.price_weight),
            (self.trust_weight, &mut target.trust_weight),
            (self.location_weight, &mut target.location_weight),
            (self.amenities_weight, &mut target.amenities_weight),
            (self.capacity_weight, &mut target.capacity_weight),
            (self.equipment_weight, &mut target.equipment_weight),
            (self.dietary_weight, &mut target.dietary_weight),
            (self.timing_weight, &mut target.timing_weight),
            (self.comfort_weight, &mut target.comfort_weight),
            (self.service_weight, &mut target.service_weight),
        ];
        for (value, slot) in pairs {
            if let Some(v) = value {
                *slot = v;
            }
        }
    }
}

/// Caller-supplied weight adjustments
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_importance: Option<BTreeMap<Category, f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flights: Option<CategoryWeightOverrides>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hotels: Option<CategoryWeightOverrides>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting_rooms: Option<CategoryWeightOverrides>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catering: Option<CategoryWeightOverrides>,
}

impl WeightOverrides {
    pub fn sub_weights(&self, category: Category) -> Option<&CategoryWeightOverrides> {
        match category {
            Category::Flights => self.flights.as_ref(),
            Category::Hotels => self.hotels.as_ref(),
            Category::MeetingRooms => self.meeting_rooms.as_ref(),
            Category::Catering => self.catering.as_ref(),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
