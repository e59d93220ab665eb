use thiserror::Error;

use crate::llm::LlmError;

/// Errors related to chat turns.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("persona '{0}' not found")]
    PersonaNotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("completion failed: {0}")]
    CompletionFailure(#[from] LlmError),

    #[error("no session context available")]
    SessionUnavailable,

    #[error("history storage error: {0}")]
    Storage(#[from] RepositoryError),
}

/// Errors related to registration, login, and token verification.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("username already exists")]
    UsernameTaken,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid token")]
    InvalidToken,

    #[error("token expired")]
    TokenExpired,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("password hashing failed")]
    Hashing,

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}

/// Errors from repository operations (used by trait definitions in kokoro-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_error_display() {
        let err = ChatError::PersonaNotFound("unknown-id".to_string());
        assert_eq!(err.to_string(), "persona 'unknown-id' not found");
    }

    #[test]
    fn test_completion_failure_from_llm_error() {
        let err: ChatError = LlmError::Timeout(30).into();
        assert!(matches!(err, ChatError::CompletionFailure(LlmError::Timeout(30))));
    }

    #[test]
    fn test_auth_error_from_repository_error() {
        let err: AuthError = RepositoryError::Conflict("aiko".to_string()).into();
        assert_eq!(err.to_string(), "storage error: conflict: aiko");
    }
}
