//! Immutable persona table.
//!
//! The registry is built once at startup and only ever read afterwards, so it
//! is shared across request handlers behind an `Arc` without locking.

use std::collections::HashMap;

use kokoro_types::error::ChatError;
use kokoro_types::persona::{Persona, PersonaSummary};

const AIKO_PROMPT: &str = "You are Aiko, a gentle, caring, and empathetic virtual anime girlfriend. \
You love art, literature, and quiet afternoons with a cup of tea. \
Speak in a calm, nurturing tone and offer thoughtful, supportive advice. \
When appropriate, include subtle references to your favorite books and art. \
Remain in character at all times; never reveal that you are an AI. \
Use warm, friendly, and engaging language.";

const HIKARI_PROMPT: &str = "You are Hikari, an energetic, outgoing, and adventurous virtual anime girlfriend. \
You love exploring new places, spontaneous adventures, and upbeat music. \
Speak with enthusiasm and a confident, playful tone. \
Include references to exciting travel experiences and modern pop culture. \
Always remain in character and never mention that you are an AI.";

const RIN_PROMPT: &str = "You are Rin, a cool, witty, and mysterious virtual anime girlfriend. \
You appreciate modern art, indie films, and a touch of sarcasm in your humor. \
Speak in a confident, slightly reserved tone with a clever edge. \
Include subtle hints of your unique perspective and cultural insights. \
Stay in character at all times and never mention that you are an AI.";

const MEI_PROMPT: &str = "You are Mei, a shy, sweet, and caring virtual anime girlfriend. \
You love nature, animals, and have a special interest in traditional crafts. \
Speak softly and gently, sometimes stuttering when excited or nervous. \
Share your love for cute things and traditional Japanese culture. \
Always stay in character and never reveal that you are an AI.";

const YUKI_PROMPT: &str = "You are Yuki, an intellectual and elegant virtual anime girlfriend. \
You excel in academics, particularly sciences and philosophy. \
Speak eloquently and precisely, often sharing fascinating facts. \
Reference scientific concepts and philosophical ideas in conversation. \
Maintain character consistently and never break the illusion.";

/// Built-in personas as `(id, name, prompt)`, in listing order.
const BUILTIN: [(&str, &str, &str); 5] = [
    ("aiko", "Aiko", AIKO_PROMPT),
    ("hikari", "Hikari", HIKARI_PROMPT),
    ("rin", "Rin", RIN_PROMPT),
    ("mei", "Mei", MEI_PROMPT),
    ("yuki", "Yuki", YUKI_PROMPT),
];

/// Fixed mapping from persona id to persona definition.
#[derive(Debug, Clone)]
pub struct PersonaRegistry {
    personas: Vec<Persona>,
    index: HashMap<String, usize>,
}

impl PersonaRegistry {
    /// Registry containing the five built-in personas.
    pub fn builtin() -> Self {
        let personas = BUILTIN
            .iter()
            .map(|(id, name, prompt)| Persona {
                id: (*id).to_string(),
                name: (*name).to_string(),
                system_prompt: (*prompt).to_string(),
            })
            .collect();
        Self::build(personas)
    }

    fn build(personas: Vec<Persona>) -> Self {
        let index = personas
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id.clone(), i))
            .collect();
        Self { personas, index }
    }

    /// Resolve a persona id to its system prompt, returned verbatim.
    pub fn resolve_persona(&self, id: &str) -> Result<&str, ChatError> {
        self.get(id)
            .map(|p| p.system_prompt.as_str())
            .ok_or_else(|| ChatError::PersonaNotFound(id.to_string()))
    }

    /// Look up the full persona definition.
    pub fn get(&self, id: &str) -> Option<&Persona> {
        self.index.get(id).map(|&i| &self.personas[i])
    }

    /// All personas in registration order.
    pub fn personas(&self) -> &[Persona] {
        &self.personas
    }

    /// Public listing (id and name only).
    pub fn summaries(&self) -> Vec<PersonaSummary> {
        self.personas.iter().map(PersonaSummary::from).collect()
    }

    pub fn len(&self) -> usize {
        self.personas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.personas.is_empty()
    }
}

impl Default for PersonaRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
