//! In-memory store adapters backed by `DashMap`.
//!
//! State lives only for the lifetime of the process.

pub mod session;
pub mod user;

pub use session::InMemorySessionStore;
pub use user::InMemoryUserRepository;
