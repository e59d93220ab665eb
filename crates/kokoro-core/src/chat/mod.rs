//! Persona-scoped chat: conversation window, session history storage, and the
//! service that ties them to the completion provider.

pub mod service;
pub mod store;
pub mod window;
