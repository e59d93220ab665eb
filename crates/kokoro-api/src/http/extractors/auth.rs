//! Bearer token authentication extractor.
//!
//! Reads `Authorization: Bearer <token>` and verifies it with the
//! `AuthService`. Handlers that take [`Authenticated`] are protected.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::http::error::AppError;
use crate::state::AppState;

/// Authenticated caller. Extracting this validates the bearer token.
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub username: String,
}

impl FromRequestParts<AppState> for Authenticated {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer(parts)?;
        let username = state.auth_service.verify_token(&token)?;
        Ok(Authenticated { username })
    }
}

/// Extract the bearer token from request headers.
fn extract_bearer(parts: &Parts) -> Result<String, AppError> {
    let auth = parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthorized("Access denied".to_string()))?;

    let auth_str = auth.to_str().map_err(|_| {
        AppError::Unauthorized("Invalid Authorization header encoding".to_string())
    })?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => Err(AppError::Unauthorized(
            "Expected 'Authorization: Bearer <token>'".to_string(),
        )),
    }
}
