//! Configuration types for Kokoro.
//!
//! `AppConfig` represents the top-level `kokoro.toml`. Every field has a
//! default, so an empty or missing file yields a working configuration.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the Kokoro service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub chat: ChatSettings,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub llm: LlmConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Origins allowed to make credentialed cross-origin requests.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
    /// Production mode: secure session cookies and SPA static serving.
    #[serde(default)]
    pub production: bool,
    /// Directory of the built single-page app, served in production.
    #[serde(default = "default_web_dir")]
    pub web_dir: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_cors_origins() -> Vec<String> {
    vec!["http://localhost:5173".to_string()]
}

fn default_web_dir() -> String {
    "dist".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
            production: false,
            web_dir: default_web_dir(),
        }
    }
}

/// Settings for chat turns and the conversation window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSettings {
    /// Model identifier passed to the completion provider.
    #[serde(default = "default_model")]
    pub model: String,
    /// Sampling temperature used when the request does not override it.
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Response-length cap in tokens.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Maximum number of stored history messages (user + assistant combined).
    #[serde(default = "default_max_history_length")]
    pub max_history_length: usize,
    /// Upper bound on a single completion call.
    #[serde(default = "default_completion_timeout_secs")]
    pub completion_timeout_secs: u64,
    /// Sessions untouched for this long are dropped by the idle sweep.
    #[serde(default = "default_session_idle_secs")]
    pub session_idle_secs: u64,
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_temperature() -> f64 {
    0.8
}

fn default_max_tokens() -> u32 {
    150
}

fn default_max_history_length() -> usize {
    6
}

fn default_completion_timeout_secs() -> u64 {
    30
}

fn default_session_idle_secs() -> u64 {
    24 * 60 * 60
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            max_history_length: default_max_history_length(),
            completion_timeout_secs: default_completion_timeout_secs(),
            session_idle_secs: default_session_idle_secs(),
        }
    }
}

/// Token issuance settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC signing secret. When absent, an ephemeral secret is generated at
    /// startup and tokens do not survive a restart.
    #[serde(default)]
    pub token_secret: Option<String>,
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,
}

fn default_token_ttl_hours() -> i64 {
    24
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: None,
            token_ttl_hours: default_token_ttl_hours(),
        }
    }
}

/// Completion provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider name used in logs (e.g. "openai").
    #[serde(default = "default_provider_name")]
    pub provider_name: String,
    /// Override the OpenAI-compatible base URL.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

fn default_provider_name() -> String {
    "openai".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider_name: default_provider_name(),
            base_url: None,
            api_key_env: default_api_key_env(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_default_values() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.chat.model, "gpt-3.5-turbo");
        assert_eq!(config.chat.temperature, 0.8);
        assert_eq!(config.chat.max_tokens, 150);
        assert_eq!(config.chat.max_history_length, 6);
        assert_eq!(config.chat.session_idle_secs, 86_400);
        assert_eq!(config.auth.token_ttl_hours, 24);
        assert!(config.auth.token_secret.is_none());
        assert_eq!(config.llm.api_key_env, "OPENAI_API_KEY");
    }

    #[test]
    fn test_app_config_deserialize_empty() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.cors_origins, vec!["http://localhost:5173"]);
        assert!(!config.server.production);
    }

    #[test]
    fn test_app_config_deserialize_partial_sections() {
        let toml_str = r#"
[server]
port = 8080
production = true

[chat]
max_history_length = 10
temperature = 0.5
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.port, 8080);
        assert!(config.server.production);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.chat.max_history_length, 10);
        assert_eq!(config.chat.temperature, 0.5);
        assert_eq!(config.chat.max_tokens, 150);
    }
}
