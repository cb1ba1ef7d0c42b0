//! Retreat planner - staged group travel planning
//!
//! Plans group retreats through a five-stage pipeline: structured requirements,
//! vendor option discovery, weighted package ranking, cart assembly and
//! checkout. Requirement extraction, vendor search and payment are external
//! collaborators; this crate validates and scores what they return.
//!
//! # Core Concepts
//!
//! - **Sessions**: every request is a session that only moves forward one stage at a time
//! - **Atomic Stages**: each stage is one read-modify-write on the state actor
//! - **Deterministic Scoring**: min-max normalized dimensions, weighted by category importance
//! - **Exact Money**: prices, taxes and fees use decimal arithmetic
//!
//! # Modules
//!
//! - [`domain`] - Requirements, catalog, weights, packages and sessions
//! - [`scoring`] - Package generation and ranking
//! - [`cart`] - Cart building, modification and pricing
//! - [`state`] - Session store actor
//! - [`pipeline`] - Stage orchestration
//! - [`collaborators`] - Extractor, search and checkout traits
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cart;
pub mod cli;
pub mod collaborators;
pub mod config;
pub mod domain;
pub mod error;
pub mod pipeline;
pub mod scoring;
pub mod state;

pub use cart::{Cart, CartBuilder, CartModification, PricingConfig, QuantityPolicy};
pub use config::Config;
pub use domain::{OptionsCatalog, Package, Ranking, Requirements, Session, Stage, WeightOverrides, WeightProfile};
pub use error::{PlanError, ValidationError};
pub use pipeline::Planner;
pub use scoring::{ScoringConfig, ScoringEngine};
pub use state::{StateEvent, StateManager};
