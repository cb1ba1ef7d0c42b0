//! Domain types for the planning pipeline
//!
//! Requirements and catalog records arrive from upstream collaborators and are
//! validated here. Packages and rankings are derived by the scoring engine.
//! Session ties them together and is the only type persisted.

mod catalog;
mod category;
mod package;
mod requirements;
mod session;
mod weights;

pub use catalog::{MAX_RATING, OptionsCatalog, VendorOption};
pub use category::{Category, Dimension};
pub use package::{CategoryBreakdown, Diagnostic, DimensionScore, Package, Ranking};
pub use requirements::{MAX_ATTENDEES, MAX_EVENT_DAYS, Requirements};
pub use session::{Confirmation, Session, Stage, VendorConfirmation};
pub use weights::{CategoryWeightOverrides, CategoryWeights, WeightOverrides, WeightProfile};

#[cfg(test)]
pub(crate) use requirements::fixtures;
