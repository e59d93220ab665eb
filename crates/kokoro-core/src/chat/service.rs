//! Chat service orchestrating one conversation turn.
//!
//! ChatService coordinates the PersonaRegistry, a SessionStore, and the
//! completion provider: read history, assemble the turn, call the model under
//! a timeout, and record the exchange. Turns on the same session are
//! serialized by a per-session lock held across that whole sequence; turns on
//! different sessions never contend.
//!
//! Lock entries live only while an operation holds or waits on them, and
//! sessions idle past `session_idle_secs` are dropped by
//! [`ChatService::expire_idle_sessions`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info};

use kokoro_types::chat::{ChatReply, Message, SessionKey};
use kokoro_types::config::ChatSettings;
use kokoro_types::error::ChatError;
use kokoro_types::llm::{CompletionRequest, LlmError};

use crate::chat::store::SessionStore;
use crate::chat::window::{assemble_turn, check_turn, record_turn};
use crate::llm::box_provider::BoxLlmProvider;
use crate::persona::PersonaRegistry;

/// Accepted range for a per-request temperature override.
const TEMPERATURE_RANGE: std::ops::RangeInclusive<f64> = 0.0..=2.0;

type SessionLocks = DashMap<SessionKey, Arc<Mutex<()>>>;

/// Exclusive hold on one session.
///
/// Dropping it releases the lock and removes the map entry when no other
/// task holds a clone of it.
struct SessionGuard<'a> {
    locks: &'a SessionLocks,
    key: &'a SessionKey,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        // The guard owns a clone of the Arc; release it before counting.
        drop(self.guard.take());
        self.locks
            .remove_if(self.key, |_, lock| Arc::strong_count(lock) == 1);
    }
}

/// Orchestrates chat turns against a session store and a completion provider.
///
/// Generic over `SessionStore` (kokoro-core never depends on kokoro-infra).
pub struct ChatService<S: SessionStore> {
    registry: PersonaRegistry,
    store: S,
    provider: BoxLlmProvider,
    settings: ChatSettings,
    locks: SessionLocks,
}

impl<S: SessionStore> ChatService<S> {
    pub fn new(
        registry: PersonaRegistry,
        store: S,
        provider: BoxLlmProvider,
        settings: ChatSettings,
    ) -> Self {
        Self {
            registry,
            store,
            provider,
            settings,
            locks: DashMap::new(),
        }
    }

    pub fn registry(&self) -> &PersonaRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &ChatSettings {
        &self.settings
    }

    /// Wait for exclusive access to `key`.
    ///
    /// The Arc is cloned out so no DashMap guard is held across `.await`.
    async fn lock_session<'a>(&'a self, key: &'a SessionKey) -> SessionGuard<'a> {
        let lock = self
            .locks
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        SessionGuard {
            locks: &self.locks,
            key,
            guard: Some(lock.lock_owned().await),
        }
    }

    /// Run one chat turn for `key`.
    ///
    /// Inputs are validated before any per-session state is created.
    /// History is written only after the provider returned a usable response.
    /// Any failure before that point leaves stored history untouched.
    pub async fn send_message(
        &self,
        key: &SessionKey,
        persona_id: &str,
        user_message: &str,
        temperature: Option<f64>,
    ) -> Result<ChatReply, ChatError> {
        let temperature = resolve_temperature(temperature, self.settings.temperature)?;
        check_turn(&self.registry, persona_id, user_message)?;

        let _session = self.lock_session(key).await;

        let history = self.store.get(key).await?;
        let turn = assemble_turn(&history, &self.registry, persona_id, user_message)?;

        let request = CompletionRequest {
            model: self.settings.model.clone(),
            messages: turn.messages,
            max_tokens: self.settings.max_tokens,
            temperature: Some(temperature),
        };

        let started = Instant::now();
        let timeout_secs = self.settings.completion_timeout_secs;
        let response = tokio::time::timeout(
            Duration::from_secs(timeout_secs),
            self.provider.complete(&request),
        )
        .await
        .map_err(|_| LlmError::Timeout(timeout_secs))??;

        if response.content.trim().is_empty() {
            return Err(LlmError::EmptyResponse.into());
        }

        let updated = record_turn(
            &history,
            user_message,
            &response.content,
            self.settings.max_history_length,
        );
        let history_len = updated.len();
        self.store.put(key, updated).await?;

        debug!(
            session = %key,
            persona = %turn.persona_id,
            provider = self.provider.name(),
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            stop_reason = %response.stop_reason,
            history_len,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "chat turn recorded"
        );

        Ok(ChatReply {
            response: response.content,
            persona_id: turn.persona_id,
            timestamp: Utc::now(),
        })
    }

    /// Reset the stored history for `key`. Idempotent.
    pub async fn clear_history(&self, key: &SessionKey) -> Result<(), ChatError> {
        let _session = self.lock_session(key).await;
        self.store.clear(key).await?;
        Ok(())
    }

    /// Current stored history for `key` (system prompt excluded).
    pub async fn history(&self, key: &SessionKey) -> Result<Vec<Message>, ChatError> {
        Ok(self.store.get(key).await?)
    }

    /// Drop all state for a destroyed session.
    pub async fn end_session(&self, key: &SessionKey) -> Result<(), ChatError> {
        let _session = self.lock_session(key).await;
        self.store.remove(key).await?;
        Ok(())
    }

    /// End every session idle for at least `idle`, returning how many ended.
    ///
    /// Also prunes lock entries abandoned by cancelled waiters.
    pub async fn expire_idle_sessions(&self, idle: Duration) -> Result<usize, ChatError> {
        let expired = self.store.idle_sessions(idle).await?;
        for key in &expired {
            self.end_session(key).await?;
        }
        self.locks.retain(|_, lock| Arc::strong_count(lock) > 1);

        if !expired.is_empty() {
            info!(expired = expired.len(), "expired idle chat sessions");
        }
        Ok(expired.len())
    }
}

/// Apply the default temperature and reject out-of-range overrides.
fn resolve_temperature(requested: Option<f64>, default: f64) -> Result<f64, ChatError> {
    match requested {
        None => Ok(default),
        Some(t) if TEMPERATURE_RANGE.contains(&t) => Ok(t),
        Some(t) => Err(ChatError::InvalidInput(format!(
            "temperature must be between 0 and 2, got {t}"
        ))),
    }
}
