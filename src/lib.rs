//! # Custodian (Admin Credentials & Sessions)
//!
//! `custodian` is the credential and session backend for a single-admin CMS.
//! It owns exactly one administrative identity and the tokens issued to it.
//!
//! ## Authentication
//!
//! Passwords are stored as Argon2id PHC strings. A successful login issues a
//! short-lived **access token** and a long-lived **refresh token**, both HS256
//! signed. Access tokens are validated statelessly; refresh tokens are also
//! persisted so they can be revoked by logout and reaped once expired.
//!
//! ## Throttling
//!
//! Login attempts are logged per email. Once the configured number of attempts
//! falls inside the rate window, further logins are refused without checking
//! the password. A successful login clears the window.
//!
//! ## Storage
//!
//! Postgres via `sqlx` in production (`sql/schema.sql`), or an in-process
//! store selected with the `memory://` DSN.

pub mod api;
pub mod auth;
pub mod cli;
pub mod store;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
