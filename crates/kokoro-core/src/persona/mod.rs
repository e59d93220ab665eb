//! Persona registry: the fixed table of chat characters.

pub mod registry;

pub use registry::PersonaRegistry;
