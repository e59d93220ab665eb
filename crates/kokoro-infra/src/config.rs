//! Configuration loader for Kokoro.
//!
//! Reads `kokoro.toml` and deserializes it into [`AppConfig`]. Falls back to
//! defaults when the file is missing or malformed, then layers environment
//! variable overrides on top.

use std::path::Path;

use secrecy::SecretString;

use kokoro_types::config::{AppConfig, LlmConfig};

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "kokoro.toml";

/// Load configuration from `path` and apply environment overrides.
///
/// - Missing file: defaults.
/// - Unreadable or unparsable file: logs a warning, defaults.
pub async fn load_config(path: &Path) -> AppConfig {
    let mut config = read_config_file(path).await;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    config
}

async fn read_config_file(path: &Path) -> AppConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config file found at {}, using defaults", path.display());
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            AppConfig::default()
        }
    }
}

/// Apply environment overrides using `lookup` to read variables.
///
/// Recognised variables: `HOST`, `PORT`, `OPENAI_BASE_URL`,
/// `KOKORO_TOKEN_SECRET` (falling back to `JWT_SECRET`),
/// `KOKORO_CORS_ORIGINS` (comma separated), `KOKORO_WEB_DIR`, and
/// `KOKORO_ENV` / `NODE_ENV` (`production` enables production mode).
pub fn apply_env_overrides(config: &mut AppConfig, lookup: impl Fn(&str) -> Option<String>) {
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(host) = get("HOST") {
        config.server.host = host;
    }
    if let Some(port) = get("PORT") {
        match port.trim().parse::<u16>() {
            Ok(port) => config.server.port = port,
            Err(_) => tracing::warn!(value = %port, "ignoring invalid PORT"),
        }
    }
    if let Some(base_url) = get("OPENAI_BASE_URL") {
        config.llm.base_url = Some(base_url);
    }
    if let Some(secret) = get("KOKORO_TOKEN_SECRET").or_else(|| get("JWT_SECRET")) {
        config.auth.token_secret = Some(secret);
    }
    if let Some(origins) = get("KOKORO_CORS_ORIGINS") {
        config.server.cors_origins = origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(String::from)
            .collect();
    }
    if let Some(dir) = get("KOKORO_WEB_DIR") {
        config.server.web_dir = dir;
    }
    if let Some(env) = get("KOKORO_ENV").or_else(|| get("NODE_ENV")) {
        config.server.production = env.eq_ignore_ascii_case("production");
    }
}

/// Read the provider API key from the environment variable named in config.
pub fn resolve_api_key(llm: &LlmConfig) -> Option<SecretString> {
    std::env::var(&llm.api_key_env)
        .ok()
        .filter(|k| !k.trim().is_empty())
        .map(SecretString::from)
}
