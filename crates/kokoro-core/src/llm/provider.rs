//! LlmProvider trait definition.
//!
//! The model-completion collaborator as seen by the chat service: it accepts
//! an ordered message sequence and returns generated text or a completion
//! error. Responses are delivered whole; there is no streaming path.

use kokoro_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for LLM provider backends.
///
/// Implementations live in kokoro-infra (e.g., `OpenAiCompatibleProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "openai").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
