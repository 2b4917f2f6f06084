//! HTTP rendering of engine failures.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use super::types::ErrorResponse;
use crate::auth::{AuthError, AuthErrorKind};

#[must_use]
pub fn status_for(kind: AuthErrorKind) -> StatusCode {
    match kind {
        AuthErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
        AuthErrorKind::InvalidCredentials
        | AuthErrorKind::InvalidToken
        | AuthErrorKind::TokenExpired => StatusCode::UNAUTHORIZED,
        AuthErrorKind::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
        AuthErrorKind::AdminAlreadyExists => StatusCode::CONFLICT,
        AuthErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Render an engine failure. Internal causes are logged here and replaced by
/// an opaque message.
pub fn error_response(err: &AuthError) -> Response {
    if let AuthError::Internal(source) = err {
        error!("Auth request failed: {source:#}");
    }
    let kind = err.kind();
    let body = ErrorResponse {
        error: kind,
        message: err.to_string(),
    };
    (status_for(kind), Json(body)).into_response()
}

/// Missing or unparseable JSON bodies are client input errors.
pub fn rejection_response(rejection: &JsonRejection) -> Response {
    let body = ErrorResponse {
        error: AuthErrorKind::InvalidInput,
        message: format!("invalid request body: {}", rejection.body_text()),
    };
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn statuses_follow_error_kinds() {
        assert_eq!(
            status_for(AuthErrorKind::InvalidInput),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(AuthErrorKind::TokenExpired),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_for(AuthErrorKind::TooManyRequests),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            status_for(AuthErrorKind::AdminAlreadyExists),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn internal_error_response_is_opaque() {
        let err = AuthError::from(anyhow!("relation \"users\" does not exist"));
        let response = error_response(&err);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
