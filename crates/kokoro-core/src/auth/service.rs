//! Authentication service.
//!
//! Generic over the repository, hasher, and token issuer so the business
//! rules (validation, duplicate detection, uniform credential errors) are
//! testable without any real crypto or storage.

use chrono::Utc;
use tracing::info;

use kokoro_types::error::{AuthError, RepositoryError};
use kokoro_types::user::User;

use super::hash::PasswordHasher;
use super::repository::UserRepository;
use super::token::TokenIssuer;

pub struct AuthService<U: UserRepository, H: PasswordHasher, T: TokenIssuer> {
    users: U,
    hasher: H,
    tokens: T,
}

impl<U: UserRepository, H: PasswordHasher, T: TokenIssuer> AuthService<U, H, T> {
    pub fn new(users: U, hasher: H, tokens: T) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    /// Create an account and return an access token for it.
    pub async fn register(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let username = validate_credentials(username, password)?;

        if self.users.get_user(username).await?.is_some() {
            return Err(AuthError::UsernameTaken);
        }

        let user = User {
            username: username.to_string(),
            password_hash: self.hasher.hash_password(password).await?,
            created_at: Utc::now(),
        };

        match self.users.create_user(&user).await {
            Ok(()) => {}
            // Lost a race with a concurrent registration of the same name.
            Err(RepositoryError::Conflict(_)) => return Err(AuthError::UsernameTaken),
            Err(e) => return Err(e.into()),
        }

        info!(username = %user.username, "user registered");
        self.tokens.issue(&user.username)
    }

    /// Check credentials and return a fresh access token.
    ///
    /// Unknown usernames and wrong passwords are reported identically.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let username = validate_credentials(username, password)
            .map_err(|_| AuthError::InvalidCredentials)?;

        let user = self
            .users
            .get_user(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !self
            .hasher
            .verify_password(password, &user.password_hash)
            .await?
        {
            return Err(AuthError::InvalidCredentials);
        }

        self.tokens.issue(&user.username)
    }

    /// Verify a bearer token and return the username it was issued to.
    pub fn verify_token(&self, token: &str) -> Result<String, AuthError> {
        Ok(self.tokens.verify(token)?.sub)
    }
}

fn validate_credentials<'a>(username: &'a str, password: &str) -> Result<&'a str, AuthError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(AuthError::InvalidInput("username must not be empty".to_string()));
    }
    if password.is_empty() {
        return Err(AuthError::InvalidInput("password must not be empty".to_string()));
    }
    Ok(username)
}
