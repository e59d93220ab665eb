//! Persona types.
//!
//! A persona is a fixed character definition: a unique identifier, a display
//! name, and the system prompt that shapes the model's tone and focus.

use serde::{Deserialize, Serialize};

/// A chat persona.
///
/// Personas are defined once at process start and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    /// Unique lookup key (e.g. "aiko").
    pub id: String,
    /// Human-readable display name.
    pub name: String,
    /// Behavioral system prompt, sent verbatim as the first message of every turn.
    pub system_prompt: String,
}

/// Public listing entry for a persona (the prompt itself is not exposed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaSummary {
    pub id: String,
    pub name: String,
}

impl From<&Persona> for PersonaSummary {
    fn from(p: &Persona) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.clone(),
        }
    }
}
