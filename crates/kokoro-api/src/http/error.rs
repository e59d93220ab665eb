//! Application error type mapping to HTTP status codes and envelope format.
//!
//! Client-correctable errors carry their message through. Everything else
//! is logged with `tracing::error!` and reported with a generic message so
//! provider or storage details never reach the caller.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use kokoro_types::error::{AuthError, ChatError};

use crate::http::response::ApiResponse;

/// Message returned for any failure the caller cannot act on.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong";

/// Message returned when the completion provider failed.
pub const COMPLETION_FAILED_MESSAGE: &str =
    "The assistant is unavailable right now. Please try again.";

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Chat turn errors.
    Chat(ChatError),
    /// Registration, login, and token errors.
    Auth(AuthError),
    /// Missing or malformed credentials on a protected route.
    Unauthorized(String),
    /// Malformed request body.
    Validation(String),
    /// Generic internal error.
    Internal(String),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        AppError::Auth(e)
    }
}

impl AppError {
    /// Status, machine-readable code, and caller-facing message.
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Chat(ChatError::PersonaNotFound(id)) => (
                StatusCode::NOT_FOUND,
                "PERSONA_NOT_FOUND",
                format!("Persona '{id}' not found"),
            ),
            AppError::Chat(ChatError::InvalidInput(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Chat(ChatError::CompletionFailure(_)) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "COMPLETION_FAILED",
                COMPLETION_FAILED_MESSAGE.to_string(),
            ),
            AppError::Chat(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                GENERIC_ERROR_MESSAGE.to_string(),
            ),
            AppError::Auth(AuthError::UsernameTaken) => (
                StatusCode::BAD_REQUEST,
                "USERNAME_TAKEN",
                "Username already exists".to_string(),
            ),
            AppError::Auth(AuthError::InvalidInput(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Auth(AuthError::InvalidCredentials) => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "Invalid username or password".to_string(),
            ),
            AppError::Auth(AuthError::InvalidToken) => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Invalid token".to_string(),
            ),
            AppError::Auth(AuthError::TokenExpired) => (
                StatusCode::UNAUTHORIZED,
                "TOKEN_EXPIRED",
                "Token expired".to_string(),
            ),
            AppError::Auth(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                GENERIC_ERROR_MESSAGE.to_string(),
            ),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                GENERIC_ERROR_MESSAGE.to_string(),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        if status.is_server_error() {
            match &self {
                AppError::Chat(e) => tracing::error!(error = %e, "chat request failed"),
                AppError::Auth(e) => tracing::error!(error = %e, "auth request failed"),
                AppError::Internal(detail) => tracing::error!(%detail, "internal error"),
                _ => {}
            }
        }

        ApiResponse::error(status, code, &message, String::new(), 0).into_response()
    }
}

#[cfg(test)]
mod tests {
    use kokoro_types::llm::LlmError;

    use super::*;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_persona_not_found_is_404() {
        let (status, body) =
            body_json(ChatError::PersonaNotFound("nobody".to_string()).into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["errors"][0]["code"], "PERSONA_NOT_FOUND");
        assert!(body["data"].is_null());
    }

    #[tokio::test]
    async fn test_invalid_input_is_400() {
        let (status, body) =
            body_json(ChatError::InvalidInput("message is empty".to_string()).into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["message"], "message is empty");
    }

    #[tokio::test]
    async fn test_completion_failure_hides_detail() {
        let err = ChatError::CompletionFailure(LlmError::Provider {
            message: "sk-live-123 rejected".to_string(),
        });
        let (status, body) = body_json(err.into()).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["errors"][0]["code"], "COMPLETION_FAILED");
        assert!(!body.to_string().contains("sk-live-123"));
    }

    #[tokio::test]
    async fn test_session_unavailable_is_generic_500() {
        let (status, body) = body_json(ChatError::SessionUnavailable.into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["errors"][0]["message"], GENERIC_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn test_internal_detail_not_leaked() {
        let (status, body) = body_json(AppError::Internal("db exploded".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.to_string().contains("db exploded"));
    }

    #[tokio::test]
    async fn test_auth_errors_map_to_401_or_400() {
        let (status, _) = body_json(AuthError::InvalidCredentials.into()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let (status, _) = body_json(AuthError::TokenExpired.into()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let (status, body) = body_json(AuthError::UsernameTaken.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["code"], "USERNAME_TAKEN");
    }
}
