//! Business logic and port trait definitions for Kokoro.
//!
//! This crate defines the "ports" (store, provider, and auth traits) that the
//! infrastructure layer implements. It depends only on `kokoro-types` -- never
//! on `kokoro-infra` or any network/storage crate.

pub mod auth;
pub mod chat;
pub mod llm;
pub mod persona;
