//! OpenTelemetry GenAI Semantic Convention attribute names.
//!
//! The completion span declares these fields up front (as
//! `tracing::field::Empty` where the value arrives with the response) and
//! the provider fills them in with `Span::record`.

pub const GEN_AI_OPERATION_NAME: &str = "gen_ai.operation.name";

pub const GEN_AI_PROVIDER_NAME: &str = "gen_ai.provider.name";

pub const GEN_AI_REQUEST_MODEL: &str = "gen_ai.request.model";

pub const GEN_AI_REQUEST_MAX_TOKENS: &str = "gen_ai.request.max_tokens";

/// Number of prompt tokens the provider billed.
pub const GEN_AI_USAGE_INPUT_TOKENS: &str = "gen_ai.usage.input_tokens";

/// Number of completion tokens the provider billed.
pub const GEN_AI_USAGE_OUTPUT_TOKENS: &str = "gen_ai.usage.output_tokens";

/// e.g. "end_turn", "max_tokens".
pub const GEN_AI_RESPONSE_FINISH_REASONS: &str = "gen_ai.response.finish_reasons";

pub const GEN_AI_RESPONSE_ID: &str = "gen_ai.response.id";

/// Operation value for a chat completion.
pub const OP_CHAT: &str = "chat";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_names_share_prefix() {
        for name in [
            GEN_AI_OPERATION_NAME,
            GEN_AI_PROVIDER_NAME,
            GEN_AI_REQUEST_MODEL,
            GEN_AI_REQUEST_MAX_TOKENS,
            GEN_AI_USAGE_INPUT_TOKENS,
            GEN_AI_USAGE_OUTPUT_TOKENS,
            GEN_AI_RESPONSE_FINISH_REASONS,
            GEN_AI_RESPONSE_ID,
        ] {
            assert!(name.starts_with("gen_ai."), "{name}");
        }
    }
}
