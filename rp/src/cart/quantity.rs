//! Requirement-derived quantities per category

use serde::{Deserialize, Serialize};

use crate::domain::{Category, Requirements};

/// How many units of each category a request needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuantityPolicy {
    /// Guests sharing one hotel room
    #[serde(rename = "occupancy-per-room")]
    pub occupancy_per_room: u32,

    /// Catered meals per attendee per day
    #[serde(rename = "meals-per-day")]
    pub meals_per_day: u32,
}

impl Default for QuantityPolicy {
    fn default() -> Self {
        Self {
            occupancy_per_room: 2,
            meals_per_day: 1,
        }
    }
}

impl QuantityPolicy {
    /// Hotel rooms needed to house every attendee
    pub fn rooms_needed(&self, requirements: &Requirements) -> u32 {
        requirements.attendees.div_ceil(self.occupancy_per_room.max(1))
    }

    /// Units to book for one option of this category
    ///
    /// flights: one seat per attendee; hotels: room-nights; meeting rooms: one
    /// per day; catering: meals across all days. Saturates at `u32::MAX`,
    /// which validated requirements never reach.
    pub fn quantity_for(&self, category: Category, requirements: &Requirements) -> u32 {
        match category {
            Category::Flights => requirements.attendees,
            Category::Hotels => self.rooms_needed(requirements).saturating_mul(requirements.nights()),
            Category::MeetingRooms => requirements.days(),
            Category::Catering => requirements
                .attendees
                .saturating_mul(requirements.days())
                .saturating_mul(self.meals_per_day.max(1)),
        }
    }

    /// Capacity (rooms or seats) a category must provide
    pub fn capacity_needed(&self, category: Category, requirements: &Requirements) -> u32 {
        match category {
            Category::Hotels => self.rooms_needed(requirements),
            _ => requirements.attendees,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::retreat;

    #[test]
    fn test_quantities_for_two_day_retreat() {
        let policy = QuantityPolicy::default();
        let req = retreat();

        assert_eq!(policy.quantity_for(Category::Flights, &req), 50);
        assert_eq!(policy.rooms_needed(&req), 25);
        assert_eq!(policy.quantity_for(Category::Hotels, &req), 25);
        assert_eq!(policy.quantity_for(Category::MeetingRooms, &req), 2);
        assert_eq!(policy.quantity_for(Category::Catering, &req), 100);
    }

    #[test]
    fn test_odd_attendees_round_rooms_up() {
        let policy = QuantityPolicy::default();
        let mut req = retreat();
        req.attendees = 51;
        assert_eq!(policy.rooms_needed(&req), 26);
        assert_eq!(policy.capacity_needed(Category::Hotels, &req), 26);
        assert_eq!(policy.capacity_needed(Category::MeetingRooms, &req), 51);
    }

    #[test]
    fn test_zero_occupancy_treated_as_one() {
        let policy = QuantityPolicy {
            occupancy_per_room: 0,
            meals_per_day: 3,
        };
        let req = retreat();
        assert_eq!(policy.rooms_needed(&req), 50);
        assert_eq!(policy.quantity_for(Category::Catering, &req), 300);
    }

    #[test]
    fn test_oversized_request_saturates() {
        let policy = QuantityPolicy {
            occupancy_per_room: 1,
            meals_per_day: 3,
        };
        let mut req = retreat();
        req.attendees = 3_000_000_000;
        assert_eq!(policy.quantity_for(Category::Catering, &req), u32::MAX);
        assert_eq!(policy.quantity_for(Category::Hotels, &req), 3_000_000_000);
    }
}
