//! Credential hashing, access-token signing, and session cookie signing.

pub mod password;
pub mod session;
pub mod token;

pub use password::Argon2PasswordHasher;
pub use session::SessionSigner;
pub use token::HmacTokenIssuer;
