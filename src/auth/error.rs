//! Failure taxonomy for the authentication engine.
//!
//! Every failure maps to exactly one [`AuthErrorKind`]. The HTTP layer picks
//! status codes from the kind; the engine never does.

use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Unknown email and wrong password both land here.
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("too many login attempts, please try again later")]
    TooManyRequests,
    #[error("invalid token")]
    InvalidToken,
    #[error("token has expired")]
    TokenExpired,
    #[error("admin user already exists")]
    AdminAlreadyExists,
    /// Storage failures and referential inconsistencies. The source chain is
    /// kept for logging only; `Display` stays opaque.
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

/// Stable discriminant exposed to callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuthErrorKind {
    InvalidInput,
    InvalidCredentials,
    TooManyRequests,
    InvalidToken,
    TokenExpired,
    AdminAlreadyExists,
    Internal,
}

impl AuthErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::InvalidCredentials => "invalid_credentials",
            Self::TooManyRequests => "too_many_requests",
            Self::InvalidToken => "invalid_token",
            Self::TokenExpired => "token_expired",
            Self::AdminAlreadyExists => "admin_already_exists",
            Self::Internal => "internal",
        }
    }
}

impl AuthError {
    #[must_use]
    pub const fn kind(&self) -> AuthErrorKind {
        match self {
            Self::InvalidInput(_) => AuthErrorKind::InvalidInput,
            Self::InvalidCredentials => AuthErrorKind::InvalidCredentials,
            Self::TooManyRequests => AuthErrorKind::TooManyRequests,
            Self::InvalidToken => AuthErrorKind::InvalidToken,
            Self::TokenExpired => AuthErrorKind::TokenExpired,
            Self::AdminAlreadyExists => AuthErrorKind::AdminAlreadyExists,
            Self::Internal(_) => AuthErrorKind::Internal,
        }
    }

    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn internal_errors_do_not_leak_source_text() {
        let err = AuthError::from(anyhow!("connection refused: 10.0.0.7:5432"));
        assert_eq!(err.to_string(), "internal error");
        assert_eq!(err.kind(), AuthErrorKind::Internal);
    }

    #[test]
    fn kinds_have_stable_codes() {
        assert_eq!(AuthError::InvalidToken.kind().as_str(), "invalid_token");
        assert_eq!(AuthError::TokenExpired.kind().as_str(), "token_expired");
        assert_eq!(
            AuthError::InvalidCredentials.kind().as_str(),
            "invalid_credentials"
        );
        assert_eq!(
            AuthError::invalid_input("email").kind(),
            AuthErrorKind::InvalidInput
        );
    }

    #[test]
    fn kind_serializes_as_snake_case() -> anyhow::Result<()> {
        let value = serde_json::to_value(AuthErrorKind::AdminAlreadyExists)?;
        assert_eq!(value, serde_json::json!("admin_already_exists"));
        Ok(())
    }
}
