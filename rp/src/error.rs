//! Error types surfaced to pipeline callers

use thiserror::Error;

use crate::cart::CartError;
use crate::domain::Stage;
use crate::scoring::ScoringError;
use crate::state::StateError;

/// A field-level validation failure in upstream data
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    /// Offending field, dotted for nested values
    pub field: String,
    pub reason: String,
    /// Set when the failure belongs to one catalog option
    pub option_id: Option<String>,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
            option_id: None,
        }
    }

    pub fn for_option(option_id: &str, field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
            option_id: Some(option_id.to_string()),
        }
    }
}

/// Errors from pipeline operations
///
/// A failed operation never changes the stored session.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Session not found: {session_id}")]
    NotFound { session_id: String },

    #[error("Cannot {operation} for session {session_id}: requires stage {required}, session is at {current}")]
    StageSkipped {
        session_id: String,
        operation: &'static str,
        required: Stage,
        current: Stage,
    },

    #[error("Invalid requirements for session {session_id}: {field}: {reason}")]
    InvalidRequirements {
        session_id: String,
        field: String,
        reason: String,
    },

    #[error(
        "Invalid catalog for session {session_id}: {field}: {reason}{}",
        .option_id.as_ref().map(|id| format!(" (option {})", id)).unwrap_or_default()
    )]
    InvalidCatalog {
        session_id: String,
        option_id: Option<String>,
        field: String,
        reason: String,
    },

    #[error("Invalid weights: {field}: {reason}")]
    InvalidWeights { field: String, reason: String },

    #[error("Package not found in session {session_id}: {package_id}")]
    PackageNotFound { session_id: String, package_id: String },

    #[error("Line item not found in cart for session {session_id}: {line_id}")]
    InvalidLineItem { session_id: String, line_id: String },

    #[error("Option not found in catalog for session {session_id}: {option_id}")]
    UnknownOption { session_id: String, option_id: String },

    #[error("Constraint violation in session {session_id}: {reason}")]
    ConstraintViolation { session_id: String, reason: String },

    #[error("Session {session_id} changed while {operation} was in progress")]
    StaleSession {
        session_id: String,
        operation: &'static str,
    },

    #[error("{stage} collaborator failed: {message}")]
    Collaborator { stage: Stage, message: String },

    #[error("State error: {0}")]
    State(StateError),
}

impl PlanError {
    pub(crate) fn invalid_requirements(session_id: &str, err: ValidationError) -> Self {
        Self::InvalidRequirements {
            session_id: session_id.to_string(),
            field: err.field,
            reason: err.reason,
        }
    }

    pub(crate) fn invalid_catalog(session_id: &str, err: ValidationError) -> Self {
        Self::InvalidCatalog {
            session_id: session_id.to_string(),
            option_id: err.option_id,
            field: err.field,
            reason: err.reason,
        }
    }

    pub(crate) fn from_scoring(err: ScoringError) -> Self {
        match err {
            ScoringError::InvalidWeights(v) => Self::InvalidWeights {
                field: v.field,
                reason: v.reason,
            },
        }
    }

    pub(crate) fn from_cart(session_id: &str, err: CartError) -> Self {
        let session_id = session_id.to_string();
        match err {
            CartError::InvalidLineItem { line_id } => Self::InvalidLineItem { session_id, line_id },
            CartError::UnknownOption { option_id } => Self::UnknownOption { session_id, option_id },
            CartError::ConstraintViolation { reason } => Self::ConstraintViolation { session_id, reason },
        }
    }
}

impl From<StateError> for PlanError {
    fn from(err: StateError) -> Self {
        match err {
            StateError::NotFound(session_id) => Self::NotFound { session_id },
            other => Self::State(other),
        }
    }
}
