//! LLM provider implementations.
//!
//! Provides a provider factory ([`create_provider`]) that constructs the
//! OpenAI-compatible provider from [`LlmConfig`], and a connection test
//! ([`test_provider_connection`]) used by `kokoro check`.

pub mod openai_compat;

use secrecy::SecretString;

use kokoro_core::llm::box_provider::BoxLlmProvider;
use kokoro_types::config::LlmConfig;
use kokoro_types::llm::{CompletionRequest, LlmError, Message};

use self::openai_compat::OpenAiCompatibleProvider;
use self::openai_compat::config::openai_defaults;

/// Create a [`BoxLlmProvider`] from configuration.
///
/// `model` is the default used when a request does not name one.
///
/// # Errors
///
/// Returns `LlmError::AuthenticationFailed` when no API key is available.
pub fn create_provider(
    config: &LlmConfig,
    model: &str,
    api_key: Option<SecretString>,
) -> Result<BoxLlmProvider, LlmError> {
    let key = api_key.ok_or(LlmError::AuthenticationFailed)?;

    let mut oai_config = openai_defaults(key, model).with_provider_name(&config.provider_name);
    if let Some(base_url) = config.base_url.as_deref() {
        oai_config = oai_config.with_base_url(base_url);
    }

    tracing::debug!(
        provider = %oai_config.provider_name,
        base_url = %oai_config.base_url,
        model,
        "completion provider configured"
    );
    Ok(BoxLlmProvider::new(OpenAiCompatibleProvider::new(oai_config)))
}

/// Test provider connectivity by sending a minimal completion request.
///
/// # Errors
///
/// Returns the LLM error if the provider fails to respond.
pub async fn test_provider_connection(provider: &BoxLlmProvider) -> Result<(), LlmError> {
    let request = CompletionRequest {
        model: String::new(), // Provider uses its configured default
        messages: vec![Message::user("Hello")],
        max_tokens: 10,
        temperature: Some(0.0),
    };
    provider.complete(&request).await?;
    Ok(())
}
