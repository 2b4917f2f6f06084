//! Bearer authentication for protected routes.
//!
//! Flow Overview: read `Authorization: Bearer <access token>`, validate it
//! statelessly through the engine and hand the caller an explicit
//! [`Principal`]. Handlers receive the principal as a plain value.

use axum::http::{HeaderMap, header::AUTHORIZATION};
use uuid::Uuid;

use crate::auth::{AuthEngine, AuthError};

/// Authenticated caller derived from a valid access token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Principal {
    pub identity_id: Uuid,
}

/// Resolve the bearer token into a principal.
///
/// # Errors
/// `InvalidToken` when the header is missing or the token is bad,
/// `TokenExpired` when it is well-formed but past its expiry.
pub fn require_auth(headers: &HeaderMap, engine: &AuthEngine) -> Result<Principal, AuthError> {
    let token = extract_bearer_token(headers).ok_or(AuthError::InvalidToken)?;
    let identity_id = engine.validate_access(&token)?;
    Ok(Principal { identity_id })
}

pub(crate) fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let trimmed = value.trim();
    let token = trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
