//! Argon2id password hashing.
//!
//! Implements the `PasswordHasher` trait from `kokoro-core` using the
//! `argon2` crate (RustCrypto ecosystem). Hashes are stored in PHC string
//! format, so the salt and parameters travel with the hash. Each hash or
//! verification runs on tokio's blocking pool.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
};

use kokoro_core::auth::hash::PasswordHasher;
use kokoro_types::error::AuthError;

/// Argon2id implementation of `PasswordHasher` with the crate's default
/// parameters.
#[derive(Default)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Run `f` on the blocking pool, mapping a panicked or cancelled task to
/// `AuthError::Hashing`.
async fn run_blocking<T, F>(f: F) -> Result<T, AuthError>
where
    F: FnOnce() -> Result<T, AuthError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        tracing::error!(error = %e, "password hashing task failed");
        AuthError::Hashing
    })?
}

fn hash_blocking(argon2: &Argon2<'_>, password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| {
            tracing::error!(error = %e, "password hashing failed");
            AuthError::Hashing
        })?;
    Ok(hash.to_string())
}

fn verify_blocking(argon2: &Argon2<'_>, password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        tracing::error!(error = %e, "stored password hash is malformed");
        AuthError::Hashing
    })?;
    Ok(argon2.verify_password(password.as_bytes(), &parsed).is_ok())
}

impl PasswordHasher for Argon2PasswordHasher {
    async fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let argon2 = self.argon2.clone();
        let password = password.to_owned();
        run_blocking(move || hash_blocking(&argon2, &password)).await
    }

    async fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let argon2 = self.argon2.clone();
        let password = password.to_owned();
        let hash = hash.to_owned();
        run_blocking(move || verify_blocking(&argon2, &password, &hash)).await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_hash_then_verify() {
        let hasher = Argon2PasswordHasher::new();
        let hash = hasher.hash_password("correct horse").await.unwrap();
        assert!(hasher.verify_password("correct horse", &hash).await.unwrap());
        assert!(!hasher.verify_password("battery staple", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_hash_is_phc_argon2id() {
        let hasher = Argon2PasswordHasher::new();
        let hash = hasher.hash_password("pw").await.unwrap();
        assert!(hash.starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn test_same_password_gets_distinct_salts() {
        let hasher = Argon2PasswordHasher::new();
        let a = hasher.hash_password("pw").await.unwrap();
        let b = hasher.hash_password("pw").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_malformed_hash_is_error() {
        let hasher = Argon2PasswordHasher::new();
        let err = hasher
            .verify_password("pw", "not-a-phc-string")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Hashing));
    }

    /// On a single-threaded runtime other tasks keep running mid-hash.
    #[tokio::test(flavor = "current_thread")]
    async fn test_hashing_does_not_stall_the_runtime() {
        let hashing = tokio::spawn(async {
            let hasher = Argon2PasswordHasher::new();
            hasher.hash_password("pw").await
        });

        let mut ticks_while_hashing = 0u32;
        loop {
            tokio::time::sleep(Duration::from_millis(1)).await;
            if hashing.is_finished() {
                break;
            }
            ticks_while_hashing += 1;
        }

        assert!(hashing.await.unwrap().unwrap().starts_with("$argon2id$"));
        assert!(ticks_while_hashing > 0);
    }
}
