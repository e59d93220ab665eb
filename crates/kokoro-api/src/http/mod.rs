//! HTTP/REST API layer for Kokoro.
//!
//! Axum-based JSON API under `/api/` with bearer-token authentication,
//! cookie-keyed chat sessions, envelope response format, and CORS support.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod response;
pub mod router;
