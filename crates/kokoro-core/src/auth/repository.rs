//! UserRepository trait definition.

use kokoro_types::error::RepositoryError;
use kokoro_types::user::User;

/// Repository trait for user account storage.
///
/// Implementations live in kokoro-infra (e.g., `InMemoryUserRepository`).
pub trait UserRepository: Send + Sync {
    /// Look up a user by exact username.
    fn get_user(
        &self,
        username: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Insert a new user. Fails with `RepositoryError::Conflict` if the
    /// username is already taken; the check and insert are atomic.
    fn create_user(
        &self,
        user: &User,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
