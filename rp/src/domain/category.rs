//! Vendor categories and scoring dimensions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Vendor category a planning request can require
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Flights,
    Hotels,
    MeetingRooms,
    Catering,
}

impl Category {
    /// Every category, in package order
    pub const ALL: [Category; 4] = [
        Category::Flights,
        Category::Hotels,
        Category::MeetingRooms,
        Category::Catering,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flights => "flights",
            Self::Hotels => "hotels",
            Self::MeetingRooms => "meeting_rooms",
            Self::Catering => "catering",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "flights" | "flight" => Ok(Self::Flights),
            "hotels" | "hotel" => Ok(Self::Hotels),
            "meeting_rooms" | "meeting_room" => Ok(Self::MeetingRooms),
            "catering" => Ok(Self::Catering),
            other => Err(format!(
                "Unknown category: '{}'. Expected one of: flights, hotels, meeting_rooms, catering",
                other
            )),
        }
    }
}

/// A sub-criterion an option is scored on within its category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Price,
    Trust,
    Location,
    Amenities,
    Capacity,
    Equipment,
    Dietary,
    Timing,
    Comfort,
    Service,
}

impl Dimension {
    pub const ALL: [Dimension; 10] = [
        Dimension::Price,
        Dimension::Trust,
        Dimension::Location,
        Dimension::Amenities,
        Dimension::Capacity,
        Dimension::Equipment,
        Dimension::Dietary,
        Dimension::Timing,
        Dimension::Comfort,
        Dimension::Service,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Price => "price",
            Self::Trust => "trust",
            Self::Location => "location",
            Self::Amenities => "amenities",
            Self::Capacity => "capacity",
            Self::Equipment => "equipment",
            Self::Dietary => "dietary",
            Self::Timing => "timing",
            Self::Comfort => "comfort",
            Self::Service => "service",
        }
    }

    /// Lower raw values score higher
    pub fn is_inverse(&self) -> bool {
        matches!(self, Self::Price)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_accepts_variants() {
        assert_eq!("meeting-rooms".parse::<Category>().unwrap(), Category::MeetingRooms);
        assert_eq!("Hotel".parse::<Category>().unwrap(), Category::Hotels);
        assert!("spa".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_serde_is_snake_case() {
        let json = serde_json::to_string(&Category::MeetingRooms).unwrap();
        assert_eq!(json, "\"meeting_rooms\"");
    }

    #[test]
    fn test_only_price_is_inverse() {
        let inverse: Vec<_> = Dimension::ALL.iter().filter(|d| d.is_inverse()).collect();
        assert_eq!(inverse, vec![&Dimension::Price]);
    }
}
