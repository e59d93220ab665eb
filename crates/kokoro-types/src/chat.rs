//! Chat session and reply types for Kokoro.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub use crate::llm::{Message, MessageRole};

/// Stable per-caller session key under which conversation history is stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionKey(pub String);

impl SessionKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The result of one successful chat turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    /// Assistant response text.
    pub response: String,
    /// Persona that produced the response. Serialized as `characterId`.
    #[serde(rename = "characterId", alias = "personaId")]
    pub persona_id: String,
    /// When the response was obtained.
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_reply_serializes_camel_case() {
        let reply = ChatReply {
            response: "Hi!".to_string(),
            persona_id: "aiko".to_string(),
            timestamp: Utc::now(),
        };
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["response"], "Hi!");
        assert_eq!(json["characterId"], "aiko");
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn test_session_key_display() {
        let key = SessionKey::new("abc-123");
        assert_eq!(key.to_string(), "abc-123");
        assert_eq!(key.as_str(), "abc-123");
    }
}
