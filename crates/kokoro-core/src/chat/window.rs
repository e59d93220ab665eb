//! Conversation window management.
//!
//! Pure functions that turn a stored history plus a new user message into the
//! exact message sequence sent to the model, and that fold a completed
//! exchange back into a bounded history.
//!
//! The system prompt is never part of stored history; it is injected fresh by
//! [`assemble_turn`] on every call.

use kokoro_types::chat::Message;
use kokoro_types::error::ChatError;

use crate::persona::PersonaRegistry;

/// Message sequence ready for the completion provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledTurn {
    /// `[system] + history + [user]`.
    pub messages: Vec<Message>,
    /// Id of the persona whose prompt was injected.
    pub persona_id: String,
}

/// Build the request sequence for one turn without touching stored history.
///
/// Fails with `InvalidInput` for an empty (or whitespace-only) message and
/// propagates `PersonaNotFound` from the registry unchanged.
pub fn assemble_turn(
    history: &[Message],
    registry: &PersonaRegistry,
    persona_id: &str,
    user_message: &str,
) -> Result<AssembledTurn, ChatError> {
    let system_prompt = check_turn(registry, persona_id, user_message)?;

    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(Message::system(system_prompt));
    messages.extend_from_slice(history);
    messages.push(Message::user(user_message));

    Ok(AssembledTurn {
        messages,
        persona_id: persona_id.to_string(),
    })
}

/// Validate a turn's inputs and return the persona's system prompt.
///
/// Empty messages are rejected before the persona is looked up.
pub fn check_turn<'r>(
    registry: &'r PersonaRegistry,
    persona_id: &str,
    user_message: &str,
) -> Result<&'r str, ChatError> {
    if user_message.trim().is_empty() {
        return Err(ChatError::InvalidInput(
            "user message must not be empty".to_string(),
        ));
    }
    registry.resolve_persona(persona_id)
}

/// Append one exchange and evict oldest-first until `len <= max_length`.
///
/// Eviction is strictly FIFO. With `max_length < 2` the new user message is
/// itself evicted, so only the most recent `max_length` entries survive.
pub fn record_turn(
    history: &[Message],
    user_message: &str,
    assistant_response: &str,
    max_length: usize,
) -> Vec<Message> {
    let mut next = Vec::with_capacity(history.len() + 2);
    next.extend_from_slice(history);
    next.push(Message::user(user_message));
    next.push(Message::assistant(assistant_response));

    if next.len() > max_length {
        let excess = next.len() - max_length;
        next.drain(..excess);
    }
    next
}

/// An empty history.
pub fn clear_history() -> Vec<Message> {
    Vec::new()
}

#[cfg(test)]
mod tests {
    use kokoro_types::chat::MessageRole;

    use super::*;

    fn exchange(n: usize) -> Vec<Message> {
        let mut h = Vec::new();
        for i in 0..n {
            h.push(Message::user(format!("u{i}")));
            h.push(Message::assistant(format!("a{i}")));
        }
        h
    }

    #[test]
    fn empty_history_assembles_system_then_user() {
        let registry = PersonaRegistry::builtin();
        let turn = assemble_turn(&[], &registry, "aiko", "Hello").unwrap();

        let aiko = registry.resolve_persona("aiko").unwrap();
        assert_eq!(
            turn.messages,
            vec![Message::system(aiko), Message::user("Hello")]
        );
        assert_eq!(turn.persona_id, "aiko");
    }

    #[test]
    fn history_is_placed_between_system_and_user_in_order() {
        let registry = PersonaRegistry::builtin();
        let history = exchange(1);
        let turn = assemble_turn(&history, &registry, "rin", "next").unwrap();

        assert_eq!(turn.messages.len(), 4);
        assert_eq!(turn.messages[0].role, MessageRole::System);
        assert_eq!(turn.messages[0].content, registry.resolve_persona("rin").unwrap());
        assert_eq!(turn.messages[1], history[0]);
        assert_eq!(turn.messages[2], history[1]);
        assert_eq!(turn.messages[3], Message::user("next"));
    }

    #[test]
    fn assemble_does_not_mutate_history() {
        let registry = PersonaRegistry::builtin();
        let history = exchange(2);
        let before = history.clone();
        let _ = assemble_turn(&history, &registry, "mei", "hi").unwrap();
        assert_eq!(history, before);
    }

    #[test]
    fn assemble_rejects_empty_message() {
        let registry = PersonaRegistry::builtin();
        for msg in ["", "   ", "\n\t"] {
            assert!(matches!(
                assemble_turn(&[], &registry, "aiko", msg),
                Err(ChatError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn assemble_propagates_persona_not_found() {
        let registry = PersonaRegistry::builtin();
        match assemble_turn(&[], &registry, "unknown-id", "Hello") {
            Err(ChatError::PersonaNotFound(id)) => assert_eq!(id, "unknown-id"),
            other => panic!("expected PersonaNotFound, got {other:?}"),
        }
    }

    #[test]
    fn record_appends_user_then_assistant() {
        let next = record_turn(&[], "Hello", "Hi there", 6);
        assert_eq!(next, vec![Message::user("Hello"), Message::assistant("Hi there")]);
    }

    #[test]
    fn record_on_full_window_evicts_oldest_exchange() {
        let history = exchange(3);
        assert_eq!(history.len(), 6);

        let next = record_turn(&history, "u3", "a3", 6);
        assert_eq!(next.len(), 6);
        assert_eq!(next[..4], history[2..]);
        assert_eq!(next[4], Message::user("u3"));
        assert_eq!(next[5], Message::assistant("a3"));
        assert!(!next.contains(&Message::user("u0")));
        assert!(!next.contains(&Message::assistant("a0")));
    }

    #[test]
    fn record_never_exceeds_bound_and_ends_with_new_exchange() {
        for max_length in 2..=9 {
            let mut history = Vec::new();
            for i in 0..12 {
                let u = format!("u{i}");
                let a = format!("a{i}");
                history = record_turn(&history, &u, &a, max_length);
                assert!(history.len() <= max_length);
                let n = history.len();
                assert_eq!(history[n - 2], Message::user(u));
                assert_eq!(history[n - 1], Message::assistant(a));
            }
        }
    }

    #[test]
    fn record_with_tiny_bound_keeps_only_most_recent() {
        let next = record_turn(&exchange(1), "u1", "a1", 1);
        assert_eq!(next, vec![Message::assistant("a1")]);

        let next = record_turn(&exchange(1), "u1", "a1", 0);
        assert!(next.is_empty());
    }

    #[test]
    fn record_preserves_insertion_order() {
        let mut history = Vec::new();
        for i in 0..10 {
            history = record_turn(&history, &format!("u{i}"), &format!("a{i}"), 7);
        }
        let contents: Vec<_> = history.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["a6", "u7", "a7", "u8", "a8", "u9", "a9"]);
    }

    #[test]
    fn record_does_not_mutate_input() {
        let history = exchange(3);
        let before = history.clone();
        let _ = record_turn(&history, "x", "y", 6);
        assert_eq!(history, before);
    }

    #[test]
    fn clear_is_idempotent() {
        assert!(clear_history().is_empty());
        assert!(clear_history().is_empty());
    }
}
