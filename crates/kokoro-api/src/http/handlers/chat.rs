//! Chat endpoints (bearer auth required, history keyed by session cookie).
//!
//! - POST /api/chat         - run one turn against a persona
//! - POST /api/chat/clear   - reset this session's history
//! - GET  /api/chat/history - read this session's stored window

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::{Deserialize, Serialize};

use kokoro_types::chat::{ChatReply, Message};

use crate::http::error::AppError;
use crate::http::extractors::auth::Authenticated;
use crate::http::extractors::session::Session;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

/// Request body for POST /api/chat.
///
/// `characterId` is accepted as an alias of `personaId`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub user_message: String,
    #[serde(default, alias = "characterId")]
    pub persona_id: String,
    #[serde(default)]
    pub temperature: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct Acknowledgement {
    pub message: &'static str,
}

pub async fn send_message(
    State(state): State<AppState>,
    auth: Authenticated,
    Session(session): Session,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<ChatReply>>, AppError> {
    let timer = RequestTimer::start();
    let Json(body) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    let reply = state
        .chat_service
        .send_message(&session, &body.persona_id, &body.user_message, body.temperature)
        .await?;

    tracing::info!(
        username = %auth.username,
        persona = %reply.persona_id,
        "chat turn completed"
    );
    Ok(Json(timer.success(reply)))
}

pub async fn clear_history(
    State(state): State<AppState>,
    _auth: Authenticated,
    Session(session): Session,
) -> Result<Json<ApiResponse<Acknowledgement>>, AppError> {
    let timer = RequestTimer::start();
    state.chat_service.clear_history(&session).await?;
    Ok(Json(timer.success(Acknowledgement {
        message: "Conversation history cleared",
    })))
}

pub async fn get_history(
    State(state): State<AppState>,
    _auth: Authenticated,
    Session(session): Session,
) -> Result<Json<ApiResponse<Vec<Message>>>, AppError> {
    let timer = RequestTimer::start();
    let history = state.chat_service.history(&session).await?;
    Ok(Json(timer.success(history)))
}

#[cfg(test)]
mod tests {
    use kokoro_types::chat::{MessageRole, SessionKey};
    use kokoro_types::error::ChatError;

    use super::*;
    use crate::state::testing::{state_failing, state_replying};

    fn caller() -> Authenticated {
        Authenticated {
            username: "taro".to_string(),
        }
    }

    fn session(key: &str) -> Session {
        Session(SessionKey::new(key))
    }

    fn body(persona: &str, message: &str) -> Result<Json<ChatRequest>, JsonRejection> {
        Ok(Json(ChatRequest {
            user_message: message.to_string(),
            persona_id: persona.to_string(),
            temperature: None,
        }))
    }

    #[test]
    fn test_chat_request_accepts_character_id() {
        let req: ChatRequest = serde_json::from_str(
            r#"{"userMessage":"hi","characterId":"rin","temperature":0.5}"#,
        )
        .unwrap();
        assert_eq!(req.persona_id, "rin");
        assert_eq!(req.user_message, "hi");
        assert_eq!(req.temperature, Some(0.5));
    }

    #[tokio::test]
    async fn test_send_message_returns_reply_and_records_history() {
        let (state, seen) = state_replying("Hello, Taro!");

        let Json(response) = send_message(
            State(state.clone()),
            caller(),
            session("s1"),
            body("aiko", "Hi"),
        )
        .await
        .unwrap();

        let reply = response.data.unwrap();
        assert_eq!(reply.response, "Hello, Taro!");
        assert_eq!(reply.persona_id, "aiko");

        let request = seen.lock().unwrap()[0].clone();
        assert_eq!(request.messages[0].role, MessageRole::System);
        assert_eq!(request.messages.last().unwrap().content, "Hi");

        let Json(history) = get_history(State(state), caller(), session("s1"))
            .await
            .unwrap();
        assert_eq!(
            history.data.unwrap(),
            vec![Message::user("Hi"), Message::assistant("Hello, Taro!")]
        );
    }

    #[tokio::test]
    async fn test_unknown_persona_is_persona_not_found() {
        let (state, seen) = state_replying("unused");
        let err = send_message(State(state), caller(), session("s1"), body("ghost", "Hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Chat(ChatError::PersonaNotFound(_))));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_provider_failure_leaves_history_empty() {
        let state = state_failing();
        let err = send_message(
            State(state.clone()),
            caller(),
            session("s1"),
            body("aiko", "Hi"),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Chat(ChatError::CompletionFailure(_))));

        let Json(history) = get_history(State(state), caller(), session("s1"))
            .await
            .unwrap();
        assert!(history.data.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clear_acknowledges_and_empties_only_this_session() {
        let (state, _) = state_replying("ok");
        for key in ["s1", "s2"] {
            send_message(State(state.clone()), caller(), session(key), body("mei", "Hi"))
                .await
                .unwrap();
        }

        let Json(ack) = clear_history(State(state.clone()), caller(), session("s1"))
            .await
            .unwrap();
        assert_eq!(ack.data.unwrap().message, "Conversation history cleared");

        let Json(h1) = get_history(State(state.clone()), caller(), session("s1"))
            .await
            .unwrap();
        let Json(h2) = get_history(State(state), caller(), session("s2"))
            .await
            .unwrap();
        assert!(h1.data.unwrap().is_empty());
        assert_eq!(h2.data.unwrap().len(), 2);
    }
}
