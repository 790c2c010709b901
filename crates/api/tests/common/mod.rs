#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use gatehouse_api::config::{CorsOrigins, DatabaseConfig, JwtConfig, ServerConfig};
use gatehouse_api::router::build_app_router;
use gatehouse_api::state::AppState;
use gatehouse_core::token::SigningSecret;
use gatehouse_db::schema::ensure_schema;
use gatehouse_db::TableNames;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "gatehouse-test-secret";
pub const TEST_PASSWORD: &str = "test_password_123!";

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses the `development_test` table set and a 30-second request timeout.
/// The database URL is never read; tests hand the pool in directly.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        app_env: "development_test".to_string(),
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        database: DatabaseConfig {
            url: "postgres://unused".to_string(),
            max_connections: 5,
        },
        cors_origins: CorsOrigins::Any,
        request_timeout_secs: 30,
        tables: TableNames::for_stage("development_test").unwrap(),
        jwt: JwtConfig {
            secret: SigningSecret::new(TEST_SECRET),
            token_ttl_hours: 72,
        },
    }
}

/// Bootstrap the schema and build the full application router, mirroring
/// `main.rs` so tests exercise the production middleware stack.
pub async fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    ensure_schema(&pool, &config.tables).await.unwrap();
    build_app_router(AppState::new(pool, config))
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
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
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

pub async fn delete_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), Some(body)).await
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn signup_body(username: &str) -> Value {
    json!({
        "username": username,
        "email": format!("{username}@example.com"),
        "password": TEST_PASSWORD,
        "fullname": "Test User",
        "phone_number": "1234567890",
        "address": "123 Main St"
    })
}

/// Sign up a user through the API and log them in. Returns the created user
/// JSON and a bearer token.
pub async fn signup_and_login(app: &Router, username: &str) -> (Value, String) {
    let response = post_json(app.clone(), "/api/v1/auth/signup", signup_body(username)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let user = body_json(response).await["data"].clone();

    let response = post_json(
        app.clone(),
        "/api/v1/auth/login",
        json!({ "email": format!("{username}@example.com"), "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let token = body_json(response).await["data"]["token"]
        .as_str()
        .unwrap()
        .to_string();

    (user, token)
}
