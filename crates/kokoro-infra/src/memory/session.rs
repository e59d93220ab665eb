//! In-memory implementation of `SessionStore`.

use std::time::Duration;

use dashmap::DashMap;
use tokio::time::Instant;

use kokoro_core::chat::store::SessionStore;
use kokoro_types::chat::{Message, SessionKey};
use kokoro_types::error::RepositoryError;

#[derive(Debug)]
struct SessionEntry {
    history: Vec<Message>,
    last_access: Instant,
}

/// Per-session conversation history held in a concurrent map.
///
/// Reads hand out owned copies, so callers never hold a shard lock across
/// an await point. Every read or write of an existing session refreshes its
/// last-access time.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: DashMap<SessionKey, SessionEntry>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    async fn get(&self, key: &SessionKey) -> Result<Vec<Message>, RepositoryError> {
        Ok(match self.sessions.get_mut(key) {
            Some(mut entry) => {
                entry.last_access = Instant::now();
                entry.history.clone()
            }
            None => Vec::new(),
        })
    }

    async fn put(&self, key: &SessionKey, history: Vec<Message>) -> Result<(), RepositoryError> {
        self.sessions.insert(
            key.clone(),
            SessionEntry {
                history,
                last_access: Instant::now(),
            },
        );
        Ok(())
    }

    async fn clear(&self, key: &SessionKey) -> Result<(), RepositoryError> {
        if let Some(mut entry) = self.sessions.get_mut(key) {
            entry.history.clear();
            entry.last_access = Instant::now();
        }
        Ok(())
    }

    async fn remove(&self, key: &SessionKey) -> Result<(), RepositoryError> {
        self.sessions.remove(key);
        Ok(())
    }

    async fn idle_sessions(&self, idle: Duration) -> Result<Vec<SessionKey>, RepositoryError> {
        let now = Instant::now();
        Ok(self
            .sessions
            .iter()
            .filter(|entry| now.duration_since(entry.last_access) >= idle)
            .map(|entry| entry.key().clone())
            .collect())
    }
}
