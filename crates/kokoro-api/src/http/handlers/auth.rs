//! Account endpoints.
//!
//! - POST /api/register - create an account, returns `{token}` (201)
//! - POST /api/login    - exchange credentials for `{token}`

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::http::error::AppError;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

/// Request body for register and login.
#[derive(Debug, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenBody {
    pub token: String,
}

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<ApiResponse<TokenBody>, AppError> {
    let timer = RequestTimer::start();
    let Json(body) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    let token = state
        .auth_service
        .register(&body.username, &body.password)
        .await?;

    Ok(timer
        .success(TokenBody { token })
        .with_status(StatusCode::CREATED))
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<ApiResponse<TokenBody>, AppError> {
    let timer = RequestTimer::start();
    let Json(body) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    let token = state
        .auth_service
        .login(&body.username, &body.password)
        .await?;

    Ok(timer.success(TokenBody { token }))
}
