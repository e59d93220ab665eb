//! Infrastructure layer for Kokoro.
//!
//! Contains implementations of the port traits defined in `kokoro-core`:
//! in-memory session and user stores, Argon2id password hashing, HMAC-signed
//! access tokens, the OpenAI-compatible completion provider, and the
//! configuration loader.

pub mod config;
pub mod crypto;
pub mod llm;
pub mod memory;
