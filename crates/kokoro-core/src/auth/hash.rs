//! PasswordHasher trait for credential storage.
//!
//! Defined in kokoro-core so the auth service can hash and verify passwords
//! without coupling to a specific algorithm. The `Argon2PasswordHasher`
//! adapter lives in kokoro-infra.

use kokoro_types::error::AuthError;

/// Abstraction over one-way password hashing.
///
/// Hashing is deliberately slow, so implementations must keep that work off
/// the async executor threads.
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password into a self-describing string (salt included).
    fn hash_password(
        &self,
        password: &str,
    ) -> impl std::future::Future<Output = Result<String, AuthError>> + Send;

    /// Check a plaintext password against a stored hash.
    fn verify_password(
        &self,
        password: &str,
        hash: &str,
    ) -> impl std::future::Future<Output = Result<bool, AuthError>> + Send;
}
