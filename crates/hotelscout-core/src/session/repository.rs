//! Session repository trait and the in-memory implementation.
//!
//! The repository owns the single user-id -> session mapping shared across
//! all users. Single-writer-per-key discipline is enforced here, not by
//! ambient globals: callers go through `save`/`delete` and never hold a
//! reference into the map.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::model::Session;
use crate::error::Result;

/// An abstract repository for live sessions, keyed by user id.
///
/// At most one session exists per user. Implementations must guard the
/// mapping against concurrent structural mutation when the runtime
/// dispatches events from more than one worker.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Returns a copy of the user's session, if one exists.
    async fn find_by_user(&self, user_id: i64) -> Result<Option<Session>>;

    /// Inserts or replaces the user's session.
    async fn save(&self, session: Session) -> Result<()>;

    /// Removes the user's session. A no-op when absent.
    async fn delete(&self, user_id: i64) -> Result<()>;

    /// Whether the user currently has a session.
    async fn exists(&self, user_id: i64) -> Result<bool> {
        Ok(self.find_by_user(user_id).await?.is_some())
    }
}

/// In-memory session repository.
///
/// Sessions are intentionally not persisted across process restarts.
#[derive(Default)]
pub struct InMemorySessionRepository {
    sessions: RwLock<HashMap<i64, Session>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn find_by_user(&self, user_id: i64) -> Result<Option<Session>> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(&user_id).cloned())
    }

    async fn save(&self, session: Session) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        sessions.insert(session.user_id, session);
        Ok(())
    }

    async fn delete(&self, user_id: i64) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        sessions.remove(&user_id);
        Ok(())
    }

    async fn exists(&self, user_id: i64) -> Result<bool> {
        let sessions = self.sessions.read().await;
        Ok(sessions.contains_key(&user_id))
    }
}
