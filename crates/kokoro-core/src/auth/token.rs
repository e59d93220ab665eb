//! TokenIssuer trait for bearer access tokens.

use kokoro_types::error::AuthError;
use kokoro_types::user::TokenClaims;

/// Issues and verifies signed access tokens.
pub trait TokenIssuer: Send + Sync {
    /// Issue a token whose subject is `username`.
    fn issue(&self, username: &str) -> Result<String, AuthError>;

    /// Verify signature and expiry, returning the embedded claims.
    ///
    /// Malformed or tampered tokens yield `InvalidToken`; expired ones
    /// yield `TokenExpired`.
    fn verify(&self, token: &str) -> Result<TokenClaims, AuthError>;
}
