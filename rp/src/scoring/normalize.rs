//! Raw signal extraction and min-max normalization

use crate::domain::{Dimension, VendorOption};

/// Raw value of a dimension for an option; missing signals count as 0
///
/// `capacity_need` caps capacity so oversized venues are not favored beyond
/// what the group needs.
pub fn raw_signal(option: &VendorOption, dimension: Dimension, capacity_need: u32) -> f64 {
    match dimension {
        Dimension::Price => option.price_f64(),
        Dimension::Trust => option.rating.unwrap_or(0.0),
        Dimension::Location => option
            .location_score
            .or_else(|| option.signals.get(&Dimension::Location).copied())
            .unwrap_or(0.0),
        Dimension::Amenities => option.amenities.len() as f64,
        Dimension::Equipment => option.equipment.len() as f64,
        Dimension::Dietary => option.dietary_options.len() as f64,
        Dimension::Capacity => option.capacity().map(|c| c.min(capacity_need)).unwrap_or(0) as f64,
        Dimension::Timing | Dimension::Comfort | Dimension::Service => {
            option.signals.get(&dimension).copied().unwrap_or(0.0)
        }
    }
}

/// Scale values onto [0, 1] over their observed range
///
/// Inverse dimensions map the minimum to 1. A flat range maps everything to 1.
pub fn normalize(values: &[f64], inverse: bool) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    if !range.is_finite() || range <= f64::EPSILON * max.abs().max(1.0) {
        return vec![1.0; values.len()];
    }

    values
        .iter()
        .map(|v| {
            let s = if inverse { (max - v) / range } else { (v - min) / range };
            s.clamp(0.0, 1.0)
        })
        .collect()
}
