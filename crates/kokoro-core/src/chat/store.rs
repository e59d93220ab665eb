//! SessionStore trait definition.
//!
//! The capability the chat service uses to read and write per-session
//! conversation history. Implementations live in kokoro-infra
//! (e.g., `InMemorySessionStore`).

use std::time::Duration;

use kokoro_types::chat::{Message, SessionKey};
use kokoro_types::error::RepositoryError;

/// Per-session conversation history storage.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Serializing turns within a session is the caller's job; a store only has
/// to make each individual operation atomic.
pub trait SessionStore: Send + Sync {
    /// Stored history for `key`, or an empty history when none exists yet.
    fn get(
        &self,
        key: &SessionKey,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, RepositoryError>> + Send;

    /// Replace the stored history for `key`.
    fn put(
        &self,
        key: &SessionKey,
        history: Vec<Message>,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Reset the history for `key` to empty. Idempotent.
    fn clear(
        &self,
        key: &SessionKey,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Drop all state for `key` (session destroyed or expired).
    fn remove(
        &self,
        key: &SessionKey,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Sessions not read or written for at least `idle`.
    fn idle_sessions(
        &self,
        idle: Duration,
    ) -> impl std::future::Future<Output = Result<Vec<SessionKey>, RepositoryError>> + Send;
}
