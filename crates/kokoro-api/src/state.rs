//! Application state wiring all services together.
//!
//! Services are generic over store/hasher/issuer traits; AppState pins them
//! to the concrete infra implementations.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::task::JoinHandle;

use kokoro_core::auth::service::AuthService;
use kokoro_core::chat::service::ChatService;
use kokoro_core::llm::box_provider::BoxLlmProvider;
use kokoro_core::persona::PersonaRegistry;
use kokoro_infra::config::resolve_api_key;
use kokoro_infra::crypto::{Argon2PasswordHasher, HmacTokenIssuer, SessionSigner};
use kokoro_infra::llm::create_provider;
use kokoro_infra::memory::{InMemorySessionStore, InMemoryUserRepository};
use kokoro_types::config::AppConfig;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteChatService = ChatService<InMemorySessionStore>;

pub type ConcreteAuthService =
    AuthService<InMemoryUserRepository, Argon2PasswordHasher, HmacTokenIssuer>;

const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// Upper bound on the pause between idle-session sweeps.
const MAX_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Shared application state used by both CLI commands and HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub auth_service: Arc<ConcreteAuthService>,
    pub session_signer: Arc<SessionSigner>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Build the completion provider from config and wire every service.
    pub fn init(config: AppConfig) -> anyhow::Result<Self> {
        let api_key = resolve_api_key(&config.llm);
        let provider = create_provider(&config.llm, &config.chat.model, api_key)
            .with_context(|| {
                format!(
                    "no API key for provider '{}'; set {}",
                    config.llm.provider_name, config.llm.api_key_env
                )
            })?;
        Self::with_provider(config, provider)
    }

    /// Wire services around an already-built provider.
    pub fn with_provider(config: AppConfig, provider: BoxLlmProvider) -> anyhow::Result<Self> {
        let token_ttl = token_ttl(config.auth.token_ttl_hours);
        let (tokens, session_signer) = match config.auth.token_secret.as_deref() {
            Some(secret) => (
                HmacTokenIssuer::new(secret.as_bytes().to_vec(), token_ttl),
                SessionSigner::new(secret.as_bytes())
                    .map_err(|e| anyhow::anyhow!("invalid session secret: {e}"))?,
            ),
            None => {
                tracing::warn!(
                    "no token secret configured; using an ephemeral secret, \
                     tokens and sessions will not survive a restart"
                );
                (
                    HmacTokenIssuer::ephemeral(token_ttl),
                    SessionSigner::ephemeral()
                        .map_err(|e| anyhow::anyhow!("invalid session secret: {e}"))?,
                )
            }
        };

        let chat_service = ChatService::new(
            PersonaRegistry::builtin(),
            InMemorySessionStore::new(),
            provider,
            config.chat.clone(),
        );
        let auth_service = AuthService::new(
            InMemoryUserRepository::new(),
            Argon2PasswordHasher::new(),
            tokens,
        );

        Ok(Self {
            chat_service: Arc::new(chat_service),
            auth_service: Arc::new(auth_service),
            session_signer: Arc::new(session_signer),
            config: Arc::new(config),
        })
    }

    /// Periodically end chat sessions idle past `chat.session_idle_secs`.
    pub fn spawn_session_sweeper(&self) -> JoinHandle<()> {
        let chat = Arc::clone(&self.chat_service);
        let idle = Duration::from_secs(chat.settings().session_idle_secs);
        let period = idle.clamp(Duration::from_secs(1), MAX_SWEEP_INTERVAL);

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if let Err(e) = chat.expire_idle_sessions(idle).await {
                    tracing::warn!(error = %e, "idle session sweep failed");
                }
            }
        })
    }
}

/// Token lifetime from config, falling back to the default for values that
/// are non-positive or too large to represent.
fn token_ttl(hours: i64) -> chrono::Duration {
    match chrono::Duration::try_hours(hours).filter(|ttl| *ttl > chrono::Duration::zero()) {
        Some(ttl) => ttl,
        None => {
            tracing::warn!(
                token_ttl_hours = hours,
                "invalid token TTL; using {DEFAULT_TOKEN_TTL_HOURS} hours"
            );
            chrono::Duration::hours(DEFAULT_TOKEN_TTL_HOURS)
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted provider and state builder shared by handler tests.

    use std::sync::Mutex;

    use kokoro_core::llm::provider::LlmProvider;
    use kokoro_types::llm::{
        CompletionRequest, CompletionResponse, LlmError, StopReason, Usage,
    };

    use super::*;

    /// Replies with `reply` or fails, and records every request it sees.
    pub struct ScriptedProvider {
        pub reply: Option<String>,
        pub seen: Arc<Mutex<Vec<CompletionRequest>>>,
    }

    impl LlmProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            self.seen.lock().unwrap().push(request.clone());
            match &self.reply {
                Some(text) => Ok(CompletionResponse {
                    id: "resp-1".to_string(),
                    content: text.clone(),
                    model: request.model.clone(),
                    stop_reason: StopReason::EndTurn,
                    usage: Usage::default(),
                }),
                None => Err(LlmError::Provider {
                    message: "upstream said no (sk-secret-detail)".to_string(),
                }),
            }
        }
    }

    /// State whose provider always answers `reply`.
    pub fn state_replying(reply: &str) -> (AppState, Arc<Mutex<Vec<CompletionRequest>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let provider = ScriptedProvider {
            reply: Some(reply.to_string()),
            seen: Arc::clone(&seen),
        };
        (
            AppState::with_provider(test_config(), BoxLlmProvider::new(provider)).unwrap(),
            seen,
        )
    }

    /// State whose provider always fails.
    pub fn state_failing() -> AppState {
        let provider = ScriptedProvider {
            reply: None,
            seen: Arc::new(Mutex::new(Vec::new())),
        };
        AppState::with_provider(test_config(), BoxLlmProvider::new(provider)).unwrap()
    }

    fn test_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.auth.token_secret = Some("test-secret".to_string());
        config
    }
}
