//! State manager messages
//!
//! Commands and responses for the actor pattern.

use sessionstore::StoreStats;
use std::fmt;
use thiserror::Error;
use tokio::sync::oneshot;

use crate::domain::{Session, Stage};
use crate::error::PlanError;

/// Errors from state operations
#[derive(Debug, Error)]
pub enum StateError {
    #[error("Session not found: {0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    StoreError(String),

    #[error("Channel error")]
    ChannelError,
}

/// Response from state operations
pub type StateResponse<T> = Result<T, StateError>;

/// Pure read-modify-write step run inside the actor
///
/// Returning an error leaves the stored session untouched.
pub type TransitionFn = Box<dyn FnOnce(&Session) -> Result<Session, PlanError> + Send>;

/// Commands sent to the StateManager actor
pub enum StateCommand {
    CreateSession {
        session: Session,
        reply: oneshot::Sender<StateResponse<String>>,
    },
    GetSession {
        id: String,
        reply: oneshot::Sender<StateResponse<Option<Session>>>,
    },
    PutSession {
        session: Session,
        reply: oneshot::Sender<StateResponse<()>>,
    },
    DeleteSession {
        id: String,
        reply: oneshot::Sender<StateResponse<bool>>,
    },
    ListSessions {
        stage_filter: Option<Stage>,
        reply: oneshot::Sender<StateResponse<Vec<Session>>>,
    },
    Transition {
        id: String,
        apply: TransitionFn,
        reply: oneshot::Sender<Result<Session, PlanError>>,
    },
    Stats {
        reply: oneshot::Sender<StoreStats>,
    },

    // Shutdown
    Shutdown,
}

impl fmt::Debug for StateCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateSession { session, .. } => write!(f, "CreateSession({})", session.id),
            Self::GetSession { id, .. } => write!(f, "GetSession({})", id),
            Self::PutSession { session, .. } => write!(f, "PutSession({})", session.id),
            Self::DeleteSession { id, .. } => write!(f, "DeleteSession({})", id),
            Self::ListSessions { stage_filter, .. } => write!(f, "ListSessions({:?})", stage_filter),
            Self::Transition { id, .. } => write!(f, "Transition({})", id),
            Self::Stats { .. } => f.write_str("Stats"),
            Self::Shutdown => f.write_str("Shutdown"),
        }
    }
}
