//! Shared domain types for Kokoro.
//!
//! This crate contains the core domain types used across the Kokoro service:
//! personas, chat messages, users, configuration, and their error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
pub mod persona;
pub mod user;
