//! One-time admin bootstrap.

use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

use super::{
    errors::{error_response, rejection_response},
    types::{ErrorResponse, SetupRequest},
};
use crate::auth::{AuthEngine, BootstrapInput, Identity};

#[utoipa::path(
    post,
    path = "/v1/auth/setup",
    request_body = SetupRequest,
    responses(
        (status = 201, description = "Admin identity created", body = Identity),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 409, description = "Admin identity already exists", body = ErrorResponse),
    ),
    tag = "auth"
)]
pub async fn setup(
    engine: Extension<Arc<AuthEngine>>,
    payload: Result<Json<SetupRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejection_response(&rejection),
    };

    let input = BootstrapInput {
        email: request.email,
        password: request.password,
        name: request.name,
    };
    match engine.bootstrap(input).await {
        Ok(identity) => (StatusCode::CREATED, Json(identity)).into_response(),
        Err(err) => error_response(&err),
    }
}
