#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{header, Method, Request, Response, Uri};
use axum::Router;
use http_body_util::BodyExt;
use lp_api::auth::jwt::{generate_access_token, JwtConfig, DEFAULT_AUDIENCE};
use lp_api::config::{GeminiConfig, ServerConfig, StripeConfig};
use lp_api::router::build_app_router;
use lp_api::state::AppState;
use lp_core::roles::ROLE_ADMIN;
use lp_core::types::UserId;
use lp_db::repositories::UserSettingsRepo;
use sqlx::PgPool;
use tower::ServiceExt;

pub const JWT_SECRET: &str = "test-jwt-secret-for-integration-tests";
pub const WEBHOOK_SECRET: &str = "whsec_test_webhook_secret";
pub const ENCRYPTION_KEY: &str =
    "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";

/// Build a test `ServerConfig` with safe defaults.
///
/// Storage, Stripe API calls, and the platform Gemini key are left
/// unconfigured; the webhook secret and encryption key are set.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        max_upload_bytes: 20 * 1024 * 1024,
        app_url: "http://localhost:3000".to_string(),
        jwt: JwtConfig {
            secret: JWT_SECRET.to_string(),
            audience: DEFAULT_AUDIENCE.to_string(),
        },
        storage: None,
        stripe: StripeConfig {
            webhook_secret: Some(WEBHOOK_SECRET.to_string()),
            ..StripeConfig::default()
        },
        gemini: GeminiConfig::default(),
        encryption_key: Some(ENCRYPTION_KEY.to_string()),
    }
}

pub fn test_state(pool: PgPool, config: ServerConfig) -> AppState {
    AppState::new(pool, config).expect("test config should be valid")
}

/// Build the full application router with the production middleware stack.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(test_state(pool, test_config()))
}

/// Same as [`build_test_app`] but with caller-supplied state.
pub fn build_test_app_with(state: AppState) -> Router {
    let config = state.config.as_ref().clone();
    build_app_router(state, &config)
}

/// Session token for `user_id`, signed with the test secret.
pub fn token_for(user_id: UserId) -> String {
    let config = test_config();
    generate_access_token(user_id, Some("user@example.com"), 3600, &config.jwt)
        .expect("token generation should succeed")
}

/// A fresh user id with a signed token.
pub fn new_user() -> (UserId, String) {
    let user_id = uuid::Uuid::new_v4();
    (user_id, token_for(user_id))
}

pub async fn make_admin(pool: &PgPool, user_id: UserId) {
    UserSettingsRepo::set_role(pool, user_id, ROLE_ADMIN)
        .await
        .expect("setting role should succeed");
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

// ---------------------------------------------------------------------------
// Upstream mocks
// ---------------------------------------------------------------------------

/// Serve `router` on an ephemeral local port and return its base URL.
///
/// Stands in for Gemini, Stripe, or Storage; the clients take the URL via
/// `with_base_url` or the storage config.
pub async fn spawn_upstream(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock upstream");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// Requests seen by a mock upstream, as `(path, body)` pairs.
#[derive(Clone, Default)]
pub struct Recorded(Arc<Mutex<Vec<(String, String)>>>);

impl Recorded {
    pub fn record(&self, uri: &Uri, body: &[u8]) {
        let body = String::from_utf8_lossy(body).into_owned();
        self.0.lock().unwrap().push((uri.path().to_string(), body));
    }

    pub fn count(&self) -> usize {
        self.0.lock().unwrap().len()
    }

    pub fn paths(&self) -> Vec<String> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .map(|(p, _)| p.clone())
            .collect()
    }

    /// Bodies of requests whose path starts with `prefix`.
    pub fn bodies_for(&self, prefix: &str) -> Vec<String> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|(p, _)| p.starts_with(prefix))
            .map(|(_, b)| b.clone())
            .collect()
    }
}
