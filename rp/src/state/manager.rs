//! StateManager - actor that owns the session Store
//!
//! Processes commands via channels for serialized access to session state.

use sessionstore::{Store, StoreStats};
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, error, info, warn};

use crate::domain::{Session, Stage};
use crate::error::PlanError;

use super::messages::{StateCommand, StateError, StateResponse, TransitionFn};

/// Event broadcast after a committed write
#[derive(Debug, Clone, PartialEq)]
pub enum StateEvent {
    SessionCreated { id: String },
    /// A transition moved the session forward
    StageAdvanced { id: String, from: Stage, to: Stage },
    /// A write that kept the stage (cart modification, re-scoring)
    SessionUpdated { id: String, revision: u64 },
    SessionDeleted { id: String },
}

/// Handle to send commands to the StateManager
#[derive(Clone)]
pub struct StateManager {
    tx: mpsc::Sender<StateCommand>,
    /// Broadcast sender for state change notifications
    event_tx: broadcast::Sender<StateEvent>,
}

impl StateManager {
    /// Spawn an actor over a store persisted at `store_path`
    pub fn spawn(store_path: impl AsRef<Path>) -> eyre::Result<Self> {
        debug!(store_path = %store_path.as_ref().display(), "spawn: called");
        let store = Store::open(store_path.as_ref())?;
        Ok(Self::with_store(store))
    }

    /// Spawn an actor over a memory-only store
    pub fn spawn_in_memory() -> Self {
        debug!("spawn_in_memory: called");
        Self::with_store(Store::in_memory())
    }

    /// Spawn an actor that takes ownership of `store`
    pub fn with_store(store: Store) -> Self {
        let (tx, rx) = mpsc::channel(256);
        let (event_tx, _) = broadcast::channel(64);

        tokio::spawn(actor_loop(store, rx, event_tx.clone()));

        info!("StateManager spawned");
        Self { tx, event_tx }
    }

    /// Subscribe to state change events
    pub fn subscribe_events(&self) -> broadcast::Receiver<StateEvent> {
        self.event_tx.subscribe()
    }

    async fn request<T>(&self, make: impl FnOnce(oneshot::Sender<T>) -> StateCommand) -> StateResponse<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(make(reply_tx))
            .await
            .map_err(|_| StateError::ChannelError)?;
        reply_rx.await.map_err(|_| StateError::ChannelError)
    }

    /// Store a new session, failing if the id is taken
    pub async fn create_session(&self, session: Session) -> StateResponse<String> {
        debug!(session_id = %session.id, "create_session: called");
        self.request(|reply| StateCommand::CreateSession { session, reply })
            .await?
    }

    /// Get a session by id
    pub async fn get_session(&self, id: &str) -> StateResponse<Option<Session>> {
        debug!(%id, "get_session: called");
        let id = id.to_string();
        self.request(|reply| StateCommand::GetSession { id, reply }).await?
    }

    /// Get a session by id, failing with NotFound if absent
    pub async fn get_session_required(&self, id: &str) -> StateResponse<Session> {
        self.get_session(id)
            .await?
            .ok_or_else(|| StateError::NotFound(id.to_string()))
    }

    /// Overwrite a session as given
    pub async fn put_session(&self, session: Session) -> StateResponse<()> {
        debug!(session_id = %session.id, revision = session.revision, "put_session: called");
        self.request(|reply| StateCommand::PutSession { session, reply })
            .await?
    }

    /// Delete a session; false if it did not exist
    pub async fn delete_session(&self, id: &str) -> StateResponse<bool> {
        debug!(%id, "delete_session: called");
        let id = id.to_string();
        self.request(|reply| StateCommand::DeleteSession { id, reply }).await?
    }

    /// List sessions ordered by id, optionally at one stage
    pub async fn list_sessions(&self, stage_filter: Option<Stage>) -> StateResponse<Vec<Session>> {
        debug!(?stage_filter, "list_sessions: called");
        self.request(|reply| StateCommand::ListSessions { stage_filter, reply })
            .await?
    }

    /// Atomically read, transform and write back one session
    ///
    /// `apply` runs on the actor task with the current session. Its result is
    /// stored with a bumped revision; an error leaves the store untouched.
    pub async fn transition<F>(&self, id: &str, apply: F) -> Result<Session, PlanError>
    where
        F: FnOnce(&Session) -> Result<Session, PlanError> + Send + 'static,
    {
        debug!(%id, "transition: called");
        let id = id.to_string();
        let apply: TransitionFn = Box::new(apply);
        self.request(|reply| StateCommand::Transition { id, apply, reply })
            .await?
    }

    /// Record counts for the underlying store
    pub async fn stats(&self) -> StateResponse<StoreStats> {
        debug!("stats: called");
        self.request(|reply| StateCommand::Stats { reply }).await
    }

    /// Shutdown the StateManager
    pub async fn shutdown(&self) -> Result<(), StateError> {
        debug!("shutdown: called");
        self.tx
            .send(StateCommand::Shutdown)
            .await
            .map_err(|_| StateError::ChannelError)
    }
}

fn store_err(e: eyre::Report) -> StateError {
    StateError::StoreError(format!("{:#}", e))
}

/// The actor loop that owns the Store and processes commands
async fn actor_loop(mut store: Store, mut rx: mpsc::Receiver<StateCommand>, event_tx: broadcast::Sender<StateEvent>) {
    debug!("actor_loop: called");

    while let Some(cmd) = rx.recv().await {
        match cmd {
            StateCommand::CreateSession { session, reply } => {
                debug!(session_id = %session.id, "actor_loop: CreateSession command");
                let result = if store.contains::<Session>(&session.id) {
                    Err(StateError::StoreError(format!("Session already exists: {}", session.id)))
                } else {
                    store.put(&session).map(|_| session.id.clone()).map_err(store_err)
                };
                if let Ok(id) = &result {
                    let _ = event_tx.send(StateEvent::SessionCreated { id: id.clone() });
                }
                let _ = reply.send(result);
            }

            StateCommand::GetSession { id, reply } => {
                debug!(%id, "actor_loop: GetSession command");
                let _ = reply.send(store.get::<Session>(&id).map_err(store_err));
            }

            StateCommand::PutSession { session, reply } => {
                debug!(session_id = %session.id, "actor_loop: PutSession command");
                let result = store.put(&session).map_err(store_err);
                if result.is_ok() {
                    let _ = event_tx.send(StateEvent::SessionUpdated {
                        id: session.id.clone(),
                        revision: session.revision,
                    });
                }
                let _ = reply.send(result);
            }

            StateCommand::DeleteSession { id, reply } => {
                debug!(%id, "actor_loop: DeleteSession command");
                let result = store.delete::<Session>(&id).map_err(store_err);
                if let Ok(true) = result {
                    let _ = event_tx.send(StateEvent::SessionDeleted { id });
                }
                let _ = reply.send(result);
            }

            StateCommand::ListSessions { stage_filter, reply } => {
                debug!(?stage_filter, "actor_loop: ListSessions command");
                let result = store.list::<Session>().map_err(store_err).map(|sessions| {
                    sessions
                        .into_iter()
                        .filter(|s| stage_filter.is_none_or(|stage| s.stage == stage))
                        .collect()
                });
                let _ = reply.send(result);
            }

            StateCommand::Transition { id, apply, reply } => {
                debug!(%id, "actor_loop: Transition command");
                let result = run_transition(&mut store, &id, apply);
                if let Ok((session, from)) = &result {
                    let event = if session.stage != *from {
                        StateEvent::StageAdvanced {
                            id: session.id.clone(),
                            from: *from,
                            to: session.stage,
                        }
                    } else {
                        StateEvent::SessionUpdated {
                            id: session.id.clone(),
                            revision: session.revision,
                        }
                    };
                    let _ = event_tx.send(event);
                }
                let _ = reply.send(result.map(|(session, _)| session));
            }

            StateCommand::Stats { reply } => {
                debug!("actor_loop: Stats command");
                let _ = reply.send(store.stats());
            }

            StateCommand::Shutdown => {
                debug!("actor_loop: Shutdown command");
                info!("StateManager shutting down");
                break;
            }
        }
    }

    debug!("StateManager actor stopped");
}

fn run_transition(store: &mut Store, id: &str, apply: TransitionFn) -> Result<(Session, Stage), PlanError> {
    let current = store
        .get::<Session>(id)
        .map_err(store_err)?
        .ok_or_else(|| StateError::NotFound(id.to_string()))?;
    let from = current.stage;

    // A panicking step fails its own caller; the actor keeps serving others
    let mut next = match panic::catch_unwind(AssertUnwindSafe(|| apply(&current))) {
        Ok(result) => result?,
        Err(_) => {
            error!(%id, "run_transition: transition panicked");
            return Err(StateError::StoreError(format!("transition on {} panicked", id)).into());
        }
    };
    if next.id != current.id {
        warn!(%id, new_id = %next.id, "run_transition: transition changed the session id");
        return Err(StateError::StoreError(format!("transition on {} changed the session id", id)).into());
    }
    next.touch();
    store.put(&next).map_err(store_err)?;
    debug!(%id, %from, to = %next.stage, revision = next.revision, "run_transition: committed");
    Ok((next, from))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_state_manager_session_crud() {
        let manager = StateManager::spawn_in_memory();

        let id = manager.create_session(Session::with_id("s1")).await.unwrap();
        assert_eq!(id, "s1");

        let session = manager.get_session("s1").await.unwrap().unwrap();
        assert_eq!(session.stage, Stage::Created);

        let sessions = manager.list_sessions(None).await.unwrap();
        assert_eq!(sessions.len(), 1);

        assert!(manager.delete_session("s1").await.unwrap());
        assert!(!manager.delete_session("s1").await.unwrap());
        assert!(manager.get_session("s1").await.unwrap().is_none());

        manager.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_duplicate_create_rejected() {
        let manager = StateManager::spawn_in_memory();
        manager.create_session(Session::with_id("s1")).await.unwrap();
        let err = manager.create_session(Session::with_id("s1")).await.unwrap_err();
        assert!(matches!(err, StateError::StoreError(_)));
    }

    #[tokio::test]
    async fn test_get_required_nonexistent() {
        let manager = StateManager::spawn_in_memory();
        let err = manager.get_session_required("missing").await.unwrap_err();
        assert!(matches!(err, StateError::NotFound(id) if id == "missing"));
    }

    #[tokio::test]
    async fn test_transition_commits_and_bumps_revision() {
        let manager = StateManager::spawn_in_memory();
        manager.create_session(Session::with_id("s1")).await.unwrap();

        let updated = manager
            .transition("s1", |s| {
                let mut next = s.clone();
                next.requirements = Some(crate::domain::fixtures::retreat());
                next.stage = Stage::RequirementsAnalyzed;
                Ok(next)
            })
            .await
            .unwrap();
        assert_eq!(updated.revision, 1);

        let stored = manager.get_session_required("s1").await.unwrap();
        assert_eq!(stored, updated);
        assert!(stored.is_consistent());
    }

    #[tokio::test]
    async fn test_failed_transition_leaves_session_unchanged() {
        let manager = StateManager::spawn_in_memory();
        manager.create_session(Session::with_id("s1")).await.unwrap();
        let before = manager.get_session_required("s1").await.unwrap();

        let err = manager
            .transition("s1", |s| {
                Err(PlanError::ConstraintViolation {
                    session_id: s.id.clone(),
                    reason: "nope".to_string(),
                })
            })
            .await
            .unwrap_err();
        assert!(matches!(err, PlanError::ConstraintViolation { .. }));
        assert_eq!(manager.get_session_required("s1").await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_panicking_transition_keeps_actor_alive() {
        let manager = StateManager::spawn_in_memory();
        manager.create_session(Session::with_id("s1")).await.unwrap();
        manager.create_session(Session::with_id("s2")).await.unwrap();

        let err = manager
            .transition("s1", |_| -> Result<Session, PlanError> { panic!("boom") })
            .await
            .unwrap_err();
        assert!(matches!(err, PlanError::State(StateError::StoreError(_))));

        assert_eq!(manager.get_session_required("s1").await.unwrap().revision, 0);
        assert_eq!(manager.get_session_required("s2").await.unwrap().stage, Stage::Created);
    }

    #[tokio::test]
    async fn test_transition_on_missing_session() {
        let manager = StateManager::spawn_in_memory();
        let err = manager.transition("ghost", |s| Ok(s.clone())).await.unwrap_err();
        assert!(matches!(err, PlanError::NotFound { session_id } if session_id == "ghost"));
    }

    #[tokio::test]
    async fn test_concurrent_transitions_serialize() {
        let manager = StateManager::spawn_in_memory();
        manager.create_session(Session::with_id("s1")).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..20 {
            let m = manager.clone();
            handles.push(tokio::spawn(async move { m.transition("s1", |s| Ok(s.clone())).await }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        assert_eq!(manager.get_session_required("s1").await.unwrap().revision, 20);
    }

    #[tokio::test]
    async fn test_events_broadcast() {
        let manager = StateManager::spawn_in_memory();
        let mut events = manager.subscribe_events();

        manager.create_session(Session::with_id("s1")).await.unwrap();
        manager
            .transition("s1", |s| {
                let mut next = s.clone();
                next.requirements = Some(crate::domain::fixtures::retreat());
                next.stage = Stage::RequirementsAnalyzed;
                Ok(next)
            })
            .await
            .unwrap();
        manager.delete_session("s1").await.unwrap();

        assert_eq!(
            events.recv().await.unwrap(),
            StateEvent::SessionCreated { id: "s1".to_string() }
        );
        assert_eq!(
            events.recv().await.unwrap(),
            StateEvent::StageAdvanced {
                id: "s1".to_string(),
                from: Stage::Created,
                to: Stage::RequirementsAnalyzed,
            }
        );
        assert_eq!(
            events.recv().await.unwrap(),
            StateEvent::SessionDeleted { id: "s1".to_string() }
        );
    }

    #[tokio::test]
    async fn test_persistent_store_survives_restart() {
        let temp = tempdir().unwrap();
        {
            let manager = StateManager::spawn(temp.path()).unwrap();
            manager.create_session(Session::with_id("s1")).await.unwrap();
            manager.transition("s1", |s| Ok(s.clone())).await.unwrap();
            manager.shutdown().await.unwrap();
        }

        let manager = StateManager::spawn(temp.path()).unwrap();
        let session = manager.get_session_required("s1").await.unwrap();
        assert_eq!(session.revision, 1);
        assert_eq!(manager.stats().await.unwrap().records, 1);
    }

    #[tokio::test]
    async fn test_list_by_stage() {
        let manager = StateManager::spawn_in_memory();
        manager.create_session(Session::with_id("a")).await.unwrap();
        let mut b = Session::with_id("b");
        b.stage = Stage::RequirementsAnalyzed;
        b.requirements = Some(crate::domain::fixtures::retreat());
        manager.put_session(b).await.unwrap();

        let analyzed = manager.list_sessions(Some(Stage::RequirementsAnalyzed)).await.unwrap();
        assert_eq!(analyzed.len(), 1);
        assert_eq!(analyzed[0].id, "b");
    }
}
