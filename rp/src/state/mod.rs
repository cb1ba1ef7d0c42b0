//! State management with actor pattern
//!
//! StateManager owns the session Store and processes messages via channels.
//! Every write, including read-modify-write transitions, runs on the single
//! actor task, so concurrent callers never lose updates.

mod manager;
mod messages;

pub use manager::{StateEvent, StateManager};
pub use messages::{StateCommand, StateError, StateResponse, TransitionFn};
