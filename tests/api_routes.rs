//! HTTP surface tests driving the assembled router in-process.

use anyhow::{Context, Result};
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use custodian::{
    api,
    auth::{AuthConfig, AuthEngine, PasswordCost},
    store::MemoryStore,
};
use secrecy::SecretString;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

const SECRET: &str = "integration-test-signing-secret-0123456789";
const ORIGIN: &str = "http://localhost:5173";

fn app() -> Result<Router> {
    let config = AuthConfig::new(SecretString::from(SECRET.to_string())).with_password_cost(
        PasswordCost {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        },
    );
    let engine = AuthEngine::new(Arc::new(MemoryStore::new()), config)?;
    api::app(Arc::new(engine), &[ORIGIN.to_string()])
}

async fn send(app: &Router, request: Request<Body>) -> Result<(StatusCode, Value)> {
    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok((status, body))
}

fn post(uri: &str, body: &Value) -> Result<Request<Body>> {
    Ok(Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body)?))?)
}

fn get(uri: &str, bearer: Option<&str>) -> Result<Request<Body>> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    Ok(builder.body(Body::empty())?)
}

fn setup_body() -> Value {
    json!({"email": "a@x.com", "password": "password1", "name": "Admin"})
}

fn login_body() -> Value {
    json!({"email": "a@x.com", "password": "password1"})
}

fn field<'a>(value: &'a Value, name: &str) -> Result<&'a str> {
    value
        .get(name)
        .and_then(Value::as_str)
        .with_context(|| format!("missing {name} in {value}"))
}

#[tokio::test]
async fn setup_then_conflict() -> Result<()> {
    let app = app()?;

    let (status, body) = send(&app, post("/v1/auth/setup", &setup_body())?).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(field(&body, "email")?, "a@x.com");
    assert_eq!(field(&body, "name")?, "Admin");
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());

    let (status, body) = send(&app, post("/v1/auth/setup", &setup_body())?).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(field(&body, "error")?, "admin_already_exists");
    Ok(())
}

#[tokio::test]
async fn setup_rejects_short_password() -> Result<()> {
    let app = app()?;
    let body = json!({"email": "a@x.com", "password": "short", "name": "Admin"});

    let (status, body) = send(&app, post("/v1/auth/setup", &body)?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(field(&body, "error")?, "invalid_input");
    Ok(())
}

#[tokio::test]
async fn malformed_body_is_bad_request() -> Result<()> {
    let app = app()?;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/v1/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))?;
    let (status, body) = send(&app, request).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(field(&body, "error")?, "invalid_input");

    let (status, _) = send(&app, post("/v1/auth/login", &json!({"email": "a@x.com"}))?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn session_round_trip() -> Result<()> {
    let app = app()?;
    send(&app, post("/v1/auth/setup", &setup_body())?).await?;

    let (status, login) = send(&app, post("/v1/auth/login", &login_body())?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(login.get("expires_in").and_then(Value::as_i64), Some(1800));
    let user = login.get("user").context("missing user")?;
    assert_eq!(field(user, "email")?, "a@x.com");
    let access = field(&login, "access_token")?.to_string();
    let refresh = field(&login, "refresh_token")?.to_string();

    let (status, me) = send(&app, get("/v1/auth/me", Some(access.as_str()))?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(field(&me, "identity_id")?, field(user, "id")?);

    let refresh_body = json!({"refresh_token": refresh});
    let (status, refreshed) = send(&app, post("/v1/auth/refresh", &refresh_body)?).await?;
    assert_eq!(status, StatusCode::OK);
    let renewed = field(&refreshed, "access_token")?.to_string();
    let (status, _) = send(&app, get("/v1/auth/me", Some(renewed.as_str()))?).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, post("/v1/auth/logout", &refresh_body)?).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    // Logout again is still a success.
    let (status, _) = send(&app, post("/v1/auth/logout", &refresh_body)?).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, post("/v1/auth/refresh", &refresh_body)?).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(field(&body, "error")?, "invalid_token");
    Ok(())
}

#[tokio::test]
async fn wrong_password_is_unauthorized() -> Result<()> {
    let app = app()?;
    send(&app, post("/v1/auth/setup", &setup_body())?).await?;

    let body = json!({"email": "a@x.com", "password": "not-the-password"});
    let (status, body) = send(&app, post("/v1/auth/login", &body)?).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(field(&body, "error")?, "invalid_credentials");
    assert_eq!(field(&body, "message")?, "invalid email or password");
    Ok(())
}

#[tokio::test]
async fn repeated_failures_are_throttled() -> Result<()> {
    let app = app()?;
    send(&app, post("/v1/auth/setup", &setup_body())?).await?;

    let wrong = json!({"email": "a@x.com", "password": "not-the-password"});
    for _ in 0..5 {
        let (status, _) = send(&app, post("/v1/auth/login", &wrong)?).await?;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    let (status, body) = send(&app, post("/v1/auth/login", &login_body())?).await?;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(field(&body, "error")?, "too_many_requests");
    Ok(())
}

#[tokio::test]
async fn empty_refresh_token_is_bad_request() -> Result<()> {
    let app = app()?;

    for uri in ["/v1/auth/refresh", "/v1/auth/logout"] {
        let (status, body) = send(&app, post(uri, &json!({"refresh_token": "  "}))?).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(field(&body, "error")?, "invalid_input");
    }
    Ok(())
}

#[tokio::test]
async fn me_requires_a_valid_access_token() -> Result<()> {
    let app = app()?;
    send(&app, post("/v1/auth/setup", &setup_body())?).await?;

    let (status, body) = send(&app, get("/v1/auth/me", None)?).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(field(&body, "error")?, "invalid_token");

    let (status, _) = send(&app, get("/v1/auth/me", Some("garbage"))?).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // A refresh token is not an access token.
    let (_, login) = send(&app, post("/v1/auth/login", &login_body())?).await?;
    let refresh = field(&login, "refresh_token")?;
    let (status, _) = send(&app, get("/v1/auth/me", Some(refresh))?).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn health_reports_store_and_app_header() -> Result<()> {
    let app = app()?;

    let response = app.clone().oneshot(get("/health", None)?).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let app_header = response
        .headers()
        .get("x-app")
        .and_then(|value| value.to_str().ok())
        .context("missing X-App header")?;
    assert!(app_header.starts_with("custodian:"));

    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let body: Value = serde_json::from_slice(&bytes)?;
    assert_eq!(field(&body, "database")?, "ok");
    assert_eq!(field(&body, "name")?, "custodian");
    Ok(())
}

#[tokio::test]
async fn responses_carry_a_request_id() -> Result<()> {
    let app = app()?;

    let response = app.clone().oneshot(get("/health", None)?).await?;
    assert!(response.headers().contains_key("x-request-id"));

    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "fixed-id")
        .body(Body::empty())?;
    let response = app.clone().oneshot(request).await?;
    assert_eq!(
        response
            .headers()
            .get("x-request-id")
            .and_then(|value| value.to_str().ok()),
        Some("fixed-id")
    );
    Ok(())
}

#[tokio::test]
async fn cors_allows_the_configured_origin_only() -> Result<()> {
    let app = app()?;

    let preflight = |origin: &str| {
        Request::builder()
            .method(Method::OPTIONS)
            .uri("/v1/auth/login")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
    };

    let response = app.clone().oneshot(preflight(ORIGIN)?).await?;
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|value| value.to_str().ok()),
        Some(ORIGIN)
    );

    let response = app.clone().oneshot(preflight("http://evil.example")?).await?;
    assert!(
        !response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
    );
    Ok(())
}

#[tokio::test]
async fn root_serves_the_banner() -> Result<()> {
    let app = app()?;

    let response = app.clone().oneshot(get("/", None)?).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let banner = String::from_utf8(bytes.to_vec())?;
    assert!(banner.starts_with("custodian "));
    Ok(())
}
