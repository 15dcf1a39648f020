//! Media library endpoints, with and without storage configured.

mod common;

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{header, Method, Request, StatusCode, Uri};
use axum::routing::post;
use axum::{Json, Router};
use common::{body_json, get_auth, new_user, Recorded};
use lp_api::config::StorageConfig;
use lp_db::repositories::MediaRepo;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

const BOUNDARY: &str = "lp-test-boundary";

fn multipart_upload(token: &str, file_name: &str, mime_type: &str, bytes: &[u8]) -> Request<Body> {
    let mut body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
         Content-Type: {mime_type}\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri("/api/v1/media")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn accept_upload(State(calls): State<Recorded>, uri: Uri, body: Bytes) -> Json<Value> {
    calls.record(&uri, &body);
    Json(json!({ "Key": uri.path() }))
}

/// App whose Storage points at a local mock accepting every upload.
async fn app_with_storage(pool: PgPool) -> (Router, Recorded) {
    let calls = Recorded::default();
    let mock = Router::new()
        .route("/storage/v1/object/{*path}", post(accept_upload))
        .with_state(calls.clone());
    let base_url = common::spawn_upstream(mock).await;

    let mut config = common::test_config();
    config.storage = Some(StorageConfig {
        url: base_url,
        service_role_key: "service-role-test".into(),
        bucket: "media".into(),
    });
    let app = common::build_test_app_with(common::test_state(pool, config));
    (app, calls)
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn upload_without_storage_returns_503(pool: PgPool) {
    let (_, token) = new_user();
    let app = common::build_test_app(pool);

    let request = multipart_upload(&token, "a.png", "image/png", b"not-really-a-png");
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn new_user_has_empty_library(pool: PgPool) {
    let (_, token) = new_user();
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/media", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"], json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_source_filter_returns_400(pool: PgPool) {
    let (_, token) = new_user();
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/media?source=stock", &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn upload_stores_object_under_user_prefix(pool: PgPool) {
    let (user_id, token) = new_user();
    let (app, calls) = app_with_storage(pool.clone()).await;
    let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    let response = app
        .oneshot(multipart_upload(&token, "hero.png", "image/png", &png))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["file_name"], "hero.png");
    assert_eq!(json["data"]["source"], "upload");
    assert_eq!(json["data"]["size_bytes"], 8);
    assert_eq!(json["data"]["user_id"], user_id.to_string());
    let storage_path = json["data"]["storage_path"].as_str().unwrap();
    assert!(storage_path.starts_with(&format!("{user_id}/")));
    assert!(storage_path.ends_with(".png"));
    assert!(json["data"]["public_url"]
        .as_str()
        .unwrap()
        .ends_with(&format!("/storage/v1/object/public/media/{storage_path}")));

    assert_eq!(
        calls.paths(),
        vec![format!("/storage/v1/object/media/{storage_path}")]
    );
    let stored = MediaRepo::list_for_user(&pool, user_id, None, 10, 0)
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn svg_upload_is_rejected_before_storage(pool: PgPool) {
    let (_, token) = new_user();
    let (app, calls) = app_with_storage(pool).await;

    let request = multipart_upload(&token, "logo.svg", "image/svg+xml", b"<svg/>");
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(calls.count(), 0);
}
