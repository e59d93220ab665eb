//! HMAC-SHA256 signed access tokens.
//!
//! Token format: `base64url(claims_json) "." base64url(hmac_sha256(payload))`,
//! both segments unpadded. The MAC covers the encoded payload segment, so
//! verification never parses attacker-controlled JSON before the signature
//! has been checked.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use argon2::password_hash::rand_core::{OsRng, RngCore};

use kokoro_core::auth::token::TokenIssuer;
use kokoro_types::error::AuthError;
use kokoro_types::user::TokenClaims;

type HmacSha256 = Hmac<Sha256>;

/// Length of a generated signing secret in bytes.
const EPHEMERAL_SECRET_LEN: usize = 32;

/// Issues and verifies HMAC-SHA256 signed tokens.
///
/// Does NOT derive Debug so the signing secret cannot end up in logs.
pub struct HmacTokenIssuer {
    secret: Vec<u8>,
    ttl: Duration,
}

impl HmacTokenIssuer {
    pub fn new(secret: impl Into<Vec<u8>>, ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            ttl,
        }
    }

    /// Issuer with a random secret. Tokens become invalid on restart.
    pub fn ephemeral(ttl: Duration) -> Self {
        let mut secret = vec![0u8; EPHEMERAL_SECRET_LEN];
        OsRng.fill_bytes(&mut secret);
        Self::new(secret, ttl)
    }

    fn mac(&self) -> Result<HmacSha256, AuthError> {
        // HMAC accepts keys of any length; this only fails on a broken build.
        HmacSha256::new_from_slice(&self.secret).map_err(|_| AuthError::InvalidToken)
    }

    fn issue_claims(&self, claims: &TokenClaims) -> Result<String, AuthError> {
        let json = serde_json::to_vec(claims).map_err(|_| AuthError::InvalidToken)?;
        let payload = URL_SAFE_NO_PAD.encode(json);

        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(format!("{payload}.{signature}"))
    }
}

impl TokenIssuer for HmacTokenIssuer {
    fn issue(&self, username: &str) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: username.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        self.issue_claims(&claims)
    }

    fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let (payload, signature) = token.split_once('.').ok_or(AuthError::InvalidToken)?;
        if signature.contains('.') {
            return Err(AuthError::InvalidToken);
        }

        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| AuthError::InvalidToken)?;

        // Constant-time comparison (via hmac crate's `verify_slice`)
        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| AuthError::InvalidToken)?;

        let json = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| AuthError::InvalidToken)?;
        let claims: TokenClaims =
            serde_json::from_slice(&json).map_err(|_| AuthError::InvalidToken)?;

        if claims.is_expired_at(Utc::now()) {
            return Err(AuthError::TokenExpired);
        }
        Ok(claims)
    }
}
