//! Account registration, login, and access-token verification.
//!
//! `AuthService` depends on three ports implemented in kokoro-infra:
//! `UserRepository` (account storage), `PasswordHasher` (credential hashing),
//! and `TokenIssuer` (signed bearer tokens).

pub mod hash;
pub mod repository;
pub mod service;
pub mod token;
