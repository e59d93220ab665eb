//! HMAC-SHA256 signed session cookie values.
//!
//! Cookie value format: `<session id> "." base64url(hmac_sha256(tag || id))`,
//! signature unpadded. The tag keeps session signatures distinct from access
//! token signatures made with the same secret.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::digest::InvalidLength;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use argon2::password_hash::rand_core::{OsRng, RngCore};

use kokoro_types::chat::SessionKey;

type HmacSha256 = Hmac<Sha256>;

const SESSION_TAG: &[u8] = b"kokoro-session:";

/// Longest session id accepted from a cookie.
const MAX_SESSION_ID_LEN: usize = 64;

const EPHEMERAL_SECRET_LEN: usize = 32;

/// Signs session ids and verifies signed cookie values.
///
/// Does NOT derive Debug so the keyed MAC state cannot end up in logs.
#[derive(Clone)]
pub struct SessionSigner {
    mac: HmacSha256,
}

impl SessionSigner {
    pub fn new(secret: &[u8]) -> Result<Self, InvalidLength> {
        Ok(Self {
            mac: HmacSha256::new_from_slice(secret)?,
        })
    }

    /// Signer with a random secret. Sessions become invalid on restart.
    pub fn ephemeral() -> Result<Self, InvalidLength> {
        let mut secret = [0u8; EPHEMERAL_SECRET_LEN];
        OsRng.fill_bytes(&mut secret);
        Self::new(&secret)
    }

    fn keyed(&self, id: &str) -> HmacSha256 {
        let mut mac = self.mac.clone();
        mac.update(SESSION_TAG);
        mac.update(id.as_bytes());
        mac
    }

    /// Cookie value carrying `key` and its signature.
    pub fn sign(&self, key: &SessionKey) -> String {
        let signature = URL_SAFE_NO_PAD.encode(self.keyed(key.as_str()).finalize().into_bytes());
        format!("{key}.{signature}")
    }

    /// Session key from a signed cookie value, or `None` when the value is
    /// malformed or its signature does not match.
    pub fn verify(&self, value: &str) -> Option<SessionKey> {
        let (id, signature) = value.split_once('.')?;
        if !is_valid_session_id(id) {
            return None;
        }
        let signature = URL_SAFE_NO_PAD.decode(signature).ok()?;
        self.keyed(id).verify_slice(&signature).ok()?;
        Some(SessionKey::new(id))
    }
}

fn is_valid_session_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_SESSION_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
