//! GET /api/personas - list selectable personas (no auth required).
//!
//! Only ids and display names are exposed; system prompts stay server-side.

use axum::Json;
use axum::extract::State;

use kokoro_types::persona::PersonaSummary;

use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

pub async fn list_personas(
    State(state): State<AppState>,
) -> Json<ApiResponse<Vec<PersonaSummary>>> {
    let timer = RequestTimer::start();
    Json(timer.success(state.chat_service.registry().summaries()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::testing::state_replying;

    #[tokio::test]
    async fn test_lists_builtin_personas_without_prompts() {
        let (state, _) = state_replying("hi");
        let Json(response) = list_personas(State(state)).await;
        let json = serde_json::to_value(&response).unwrap();

        let personas = json["data"].as_array().unwrap();
        assert_eq!(personas.len(), 5);
        assert_eq!(personas[0]["id"], "aiko");
        assert!(personas[0]["name"].is_string());
        assert!(personas[0].get("system_prompt").is_none());
    }
}
