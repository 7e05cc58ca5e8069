#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use annunci_api::auth::jwt::{generate_access_token, JwtConfig};
use annunci_api::config::ServerConfig;
use annunci_api::router::build_app_router;
use annunci_api::state::AppState;
use annunci_db::models::user::CreateUser;
use annunci_db::repositories::UserRepo;
use annunci_events::ConversationBus;

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret so
/// tests can mint their own tokens.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-not-for-production".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// This goes through `build_app_router` so integration tests exercise the
/// same middleware stack (CORS, request ID, timeout, tracing, panic
/// recovery) that production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        bus: Arc::new(ConversationBus::new()),
        email: None,
    };
    build_app_router(state, &config)
}

/// Seed a user row and return its id.
pub async fn seed_user(pool: &PgPool, email: &str, role: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            display_name: email.split('@').next().unwrap().to_string(),
            role: role.to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

/// Mint an access token for a seeded user.
pub fn token_for(user_id: i64) -> String {
    generate_access_token(user_id, &test_config().jwt).unwrap()
}

/// Issue a request against the app. `token` adds a bearer header; `body`
/// is sent as JSON.
pub async fn request(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    request(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: &Router, uri: &str, token: &str) -> Response<Body> {
    request(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_auth(app: &Router, uri: &str, token: &str, body: Value) -> Response<Body> {
    request(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn post_empty_auth(app: &Router, uri: &str, token: &str) -> Response<Body> {
    request(app, Method::POST, uri, Some(token), None).await
}

pub async fn put_auth(app: &Router, uri: &str, token: &str, body: Value) -> Response<Body> {
    request(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: &Router, uri: &str, token: &str) -> Response<Body> {
    request(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert status and return the JSON body (with a readable failure that
/// includes the body when the status is wrong).
pub async fn expect_status(response: Response<Body>, expected: StatusCode) -> Value {
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8_lossy(&bytes).to_string();
    assert_eq!(status, expected, "unexpected status, body: {text}");
    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    }
}
