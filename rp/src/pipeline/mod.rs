//! Staged planning pipeline
//!
//! [`Planner`] sequences requirements analysis, option discovery, ranking,
//! cart building and checkout against the [`StateManager`]. Each stage runs as
//! one atomic transition and advances the session exactly one step.
//!
//! [`StateManager`]: crate::state::StateManager

mod planner;

pub use planner::Planner;
