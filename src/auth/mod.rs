//! Credential and session core.
//!
//! Flow Overview:
//! 1) `bootstrap` creates the single admin identity (Argon2id hash, one-time).
//! 2) `login` checks the attempt window, verifies the password and issues an
//!    access token plus a persisted refresh token.
//! 3) `refresh` trades a live refresh token for a new access token.
//! 4) `logout` deletes the refresh token; `validate_access` checks bearers
//!    statelessly for protected routes.
//! 5) A background worker reaps expired refresh tokens.

pub mod cleanup;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod password;
pub mod rate_limit;
pub mod token;
mod validation;

pub use cleanup::spawn_cleanup_worker;
pub use config::{AuthConfig, MIN_SECRET_LEN, PasswordCost};
pub use engine::AuthEngine;
pub use error::{AuthError, AuthErrorKind, AuthResult};
pub use models::{
    BootstrapInput, CreateOutcome, CredentialRecord, Identity, LoginAttemptRecord, LoginInput,
    LoginOutcome, RefreshOutcome, RefreshTokenRecord,
};
pub use password::{PasswordCheck, PasswordHasher};
pub use rate_limit::{LoginRateLimiter, RateLimitDecision};
pub use token::{IssuedToken, TokenClaims, TokenCodec, TokenError, TokenKind};
