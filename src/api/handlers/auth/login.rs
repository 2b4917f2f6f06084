//! Password login.

use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

use super::{
    errors::{error_response, rejection_response},
    types::{ErrorResponse, LoginRequest, LoginResponse},
};
use crate::auth::{AuthEngine, LoginInput};

#[utoipa::path(
    post,
    path = "/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Tokens issued", body = LoginResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Invalid email or password", body = ErrorResponse),
        (status = 429, description = "Too many login attempts", body = ErrorResponse),
    ),
    tag = "auth"
)]
pub async fn login(
    engine: Extension<Arc<AuthEngine>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejection_response(&rejection),
    };

    let input = LoginInput {
        email: request.email,
        password: request.password,
    };
    match engine.login(input).await {
        Ok(outcome) => {
            let response = LoginResponse {
                user: outcome.identity,
                access_token: outcome.access_token,
                refresh_token: outcome.refresh_token,
                expires_in: outcome.expires_in,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => error_response(&err),
    }
}
