//! Authenticated identity lookup.
//!
//! Demonstrates the request-authorization gate: the bearer is resolved into a
//! [`Principal`](super::auth::Principal) and passed on explicitly.

use axum::{
    Json,
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use std::sync::Arc;

use super::auth::{
    Principal, error_response, require_auth,
    types::{ErrorResponse, MeResponse},
};
use crate::auth::AuthEngine;

#[utoipa::path(
    get,
    path = "/v1/auth/me",
    responses(
        (status = 200, description = "Return the authenticated identity id.", body = MeResponse),
        (status = 401, description = "Missing, invalid or expired access token.", body = ErrorResponse),
    ),
    security(("bearer" = [])),
    tag = "auth"
)]
pub async fn get_me(headers: HeaderMap, engine: Extension<Arc<AuthEngine>>) -> impl IntoResponse {
    match require_auth(&headers, &engine) {
        Ok(principal) => (StatusCode::OK, Json(me_response(principal))).into_response(),
        Err(err) => error_response(&err),
    }
}

fn me_response(principal: Principal) -> MeResponse {
    MeResponse {
        identity_id: principal.identity_id,
    }
}
