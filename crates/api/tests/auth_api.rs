//! Authentication and role enforcement at the HTTP layer.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, get_auth, new_user};
use lp_api::auth::jwt::{generate_access_token, JwtConfig, DEFAULT_AUDIENCE};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_token_returns_401(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app, "/api/v1/me").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn token_signed_with_other_secret_returns_401(pool: PgPool) {
    let app = common::build_test_app(pool);
    let foreign = JwtConfig {
        secret: "some-other-project-secret".into(),
        audience: DEFAULT_AUDIENCE.into(),
    };
    let token = generate_access_token(uuid::Uuid::new_v4(), None, 3600, &foreign).unwrap();

    let response = get_auth(app, "/api/v1/me", &token).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn first_request_creates_free_user_settings(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (user_id, token) = new_user();

    let response = get_auth(app, "/api/v1/me", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["user_id"], user_id.to_string());
    assert_eq!(json["data"]["role"], "user");
    assert_eq!(json["data"]["plan"], "free");
    assert_eq!(json["data"]["has_gemini_api_key"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_admin_cannot_reach_admin_routes(pool: PgPool) {
    let (_, token) = new_user();

    for uri in [
        "/api/v1/admin/config",
        "/api/v1/admin/templates",
        "/api/v1/admin/inquiries",
    ] {
        let app = common::build_test_app(pool.clone());
        let response = get_auth(app, uri, &token).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{uri}");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_can_reach_admin_routes(pool: PgPool) {
    let (admin_id, token) = new_user();
    common::make_admin(&pool, admin_id).await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/admin/inquiries", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
}
