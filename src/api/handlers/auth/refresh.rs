//! Refresh token exchange and logout.

use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::{
    errors::{error_response, rejection_response},
    types::{ErrorResponse, RefreshResponse, RefreshTokenRequest},
};
use crate::auth::{AuthEngine, AuthError};

/// Pull a non-empty refresh token out of the request body.
fn refresh_token_from(
    payload: Result<Json<RefreshTokenRequest>, JsonRejection>,
) -> Result<String, Response> {
    let Json(request) = payload.map_err(|rejection| rejection_response(&rejection))?;
    if request.refresh_token.trim().is_empty() {
        let err = AuthError::InvalidInput("refresh token is required".to_string());
        return Err(error_response(&err));
    }
    Ok(request.refresh_token)
}

#[utoipa::path(
    post,
    path = "/v1/auth/refresh",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "New access token issued", body = RefreshResponse),
        (status = 400, description = "Missing refresh token", body = ErrorResponse),
        (status = 401, description = "Invalid or expired refresh token", body = ErrorResponse),
    ),
    tag = "auth"
)]
pub async fn refresh(
    engine: Extension<Arc<AuthEngine>>,
    payload: Result<Json<RefreshTokenRequest>, JsonRejection>,
) -> impl IntoResponse {
    let token = match refresh_token_from(payload) {
        Ok(token) => token,
        Err(response) => return response,
    };

    match engine.refresh(&token).await {
        Ok(outcome) => {
            let response = RefreshResponse {
                access_token: outcome.access_token,
                expires_in: outcome.expires_in,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => error_response(&err),
    }
}

#[utoipa::path(
    post,
    path = "/v1/auth/logout",
    request_body = RefreshTokenRequest,
    responses(
        (status = 204, description = "Refresh token revoked (or already absent)"),
        (status = 400, description = "Missing refresh token", body = ErrorResponse),
    ),
    tag = "auth"
)]
pub async fn logout(
    engine: Extension<Arc<AuthEngine>>,
    payload: Result<Json<RefreshTokenRequest>, JsonRejection>,
) -> impl IntoResponse {
    let token = match refresh_token_from(payload) {
        Ok(token) => token,
        Err(response) => return response,
    };

    match engine.logout(&token).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(&err),
    }
}
