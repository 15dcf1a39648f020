//! Contact form submission and the admin inbox.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, delete_auth, get_auth, new_user, patch_json_auth, post_json, post_json_auth,
};
use serde_json::json;
use sqlx::PgPool;

fn inquiry() -> serde_json::Value {
    json!({
        "name": "Hanako",
        "email": "hanako@example.com",
        "subject": "Pricing",
        "message": "Do you offer annual billing?"
    })
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn anonymous_submission_is_accepted(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(app, "/api/v1/inquiries", inquiry()).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "new");
    assert!(json["data"]["user_id"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn signed_in_submission_is_linked_to_user(pool: PgPool) {
    let (user_id, token) = new_user();
    let app = common::build_test_app(pool);

    let response = post_json_auth(app, "/api/v1/inquiries", &token, inquiry()).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["user_id"], user_id.to_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_email_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let mut body = inquiry();
    body["email"] = json!("not-an-email");

    let response = post_json(app, "/api/v1/inquiries", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_triages_inquiry(pool: PgPool) {
    let (admin_id, admin) = new_user();
    common::make_admin(&pool, admin_id).await;

    let app = common::build_test_app(pool.clone());
    let created = body_json(post_json(app, "/api/v1/inquiries", inquiry()).await).await;
    let id = created["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/v1/admin/inquiries/{id}");

    let app = common::build_test_app(pool.clone());
    let response = patch_json_auth(
        app,
        &uri,
        &admin,
        json!({ "status": "in_progress", "admin_note": "Replied by mail" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "in_progress");
    assert_eq!(json["data"]["admin_note"], "Replied by mail");

    let app = common::build_test_app(pool.clone());
    let json = body_json(
        get_auth(app, "/api/v1/admin/inquiries?status=in_progress", &admin).await,
    )
    .await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/admin/inquiries?status=new", &admin).await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 0);

    let app = common::build_test_app(pool.clone());
    assert_eq!(
        delete_auth(app, &uri, &admin).await.status(),
        StatusCode::NO_CONTENT
    );

    let app = common::build_test_app(pool);
    assert_eq!(
        get_auth(app, &uri, &admin).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_status_is_rejected(pool: PgPool) {
    let (admin_id, admin) = new_user();
    common::make_admin(&pool, admin_id).await;

    let app = common::build_test_app(pool.clone());
    let created = body_json(post_json(app, "/api/v1/inquiries", inquiry()).await).await;
    let id = created["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let response = patch_json_auth(
        app,
        &format!("/api/v1/admin/inquiries/{id}"),
        &admin,
        json!({ "status": "archived" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
