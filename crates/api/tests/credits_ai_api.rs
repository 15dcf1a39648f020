//! Credit summary, metered generation, and refunds on provider failure.

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{Response, StatusCode, Uri};
use axum::routing::post;
use axum::{Json, Router};
use common::{body_json, get_auth, new_user, post_json_auth, Recorded};
use lp_api::config::StorageConfig;
use lp_core::credits::reasons;
use lp_core::retry::RetryPolicy;
use lp_db::repositories::{CreditRepo, MediaRepo};
use lp_providers::GeminiClient;
use serde_json::{json, Value};
use sqlx::PgPool;

const FREE_CREDITS: i64 = 30;

/// Eight-byte PNG signature, base64-encoded.
const PNG_BASE64: &str = "iVBORw0KGgo=";

fn gemini_at(base_url: &str) -> GeminiClient {
    GeminiClient::new(None, None)
        .with_base_url(base_url)
        .with_retry_policy(RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(1),
        })
}

async fn request_text(app: Router, token: &str) -> Response<Body> {
    let body = json!({ "prompt": "Write a headline" });
    post_json_auth(app, "/api/v1/ai/text", token, body).await
}

async fn request_image(app: Router, token: &str) -> Response<Body> {
    let body = json!({ "prompt": "A red fox" });
    post_json_auth(app, "/api/v1/ai/image", token, body).await
}

/// App whose platform Gemini key points at a closed local port.
fn app_with_unreachable_gemini(pool: PgPool) -> axum::Router {
    let mut config = common::test_config();
    config.gemini.platform_api_key = Some("platform-test-key".into());
    let mut state = common::test_state(pool, config);
    state.gemini = Arc::new(gemini_at("http://127.0.0.1:1"));
    common::build_test_app_with(state)
}

/// Mock upstream answering Gemini calls from a fixed script (the last reply
/// repeats) and accepting Storage uploads.
#[derive(Clone)]
struct Upstream {
    gemini_calls: Recorded,
    storage_calls: Recorded,
    replies: Arc<Vec<(StatusCode, Value)>>,
}

async fn gemini_reply(
    State(upstream): State<Upstream>,
    uri: Uri,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let n = upstream.gemini_calls.count();
    upstream.gemini_calls.record(&uri, &body);
    let (status, reply) = &upstream.replies[n.min(upstream.replies.len() - 1)];
    (*status, Json(reply.clone()))
}

async fn storage_upload(State(upstream): State<Upstream>, uri: Uri, body: Bytes) -> Json<Value> {
    upstream.storage_calls.record(&uri, &body);
    Json(json!({ "Key": uri.path() }))
}

/// App wired to a scripted Gemini and a working Storage.
async fn app_with_upstream(pool: PgPool, replies: Vec<(StatusCode, Value)>) -> (Router, Upstream) {
    let upstream = Upstream {
        gemini_calls: Recorded::default(),
        storage_calls: Recorded::default(),
        replies: Arc::new(replies),
    };
    let mock = Router::new()
        .route("/v1beta/models/{*call}", post(gemini_reply))
        .route("/storage/v1/object/{*path}", post(storage_upload))
        .with_state(upstream.clone());
    let base_url = common::spawn_upstream(mock).await;

    let mut config = common::test_config();
    config.gemini.platform_api_key = Some("platform-test-key".into());
    config.storage = Some(StorageConfig {
        url: base_url.clone(),
        service_role_key: "service-role-test".into(),
        bucket: "media".into(),
    });
    let mut state = common::test_state(pool, config);
    state.gemini = Arc::new(gemini_at(&base_url));
    (common::build_test_app_with(state), upstream)
}

fn text_reply(text: &str) -> (StatusCode, Value) {
    (
        StatusCode::OK,
        json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] }),
    )
}

fn error_reply(status: StatusCode) -> (StatusCode, Value) {
    (status, json!({ "error": { "code": status.as_u16(), "message": "upstream says no" } }))
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn first_summary_grants_full_allowance(pool: PgPool) {
    let (_, token) = new_user();
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/credits", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["plan"], "free");
    assert_eq!(json["data"]["balance"], FREE_CREDITS);
    assert_eq!(json["data"]["used_this_period"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn generation_without_any_key_returns_503(pool: PgPool) {
    let (_, token) = new_user();
    let app = common::build_test_app(pool);

    let response = request_text(app, &token).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_balance_returns_402(pool: PgPool) {
    let (user_id, token) = new_user();
    CreditRepo::get_current(&pool, user_id, FREE_CREDITS)
        .await
        .unwrap();
    CreditRepo::charge(&pool, user_id, FREE_CREDITS, reasons::TEXT_GENERATION, None)
        .await
        .unwrap()
        .expect("full balance can be charged");

    let app = app_with_unreachable_gemini(pool);
    let response = request_text(app, &token).await;

    assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INSUFFICIENT_CREDITS");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn failed_generation_refunds_the_charge(pool: PgPool) {
    let (user_id, token) = new_user();

    let app = app_with_unreachable_gemini(pool.clone());
    let response = request_text(app, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let balance = CreditRepo::find_by_user(&pool, user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(balance.balance, FREE_CREDITS);

    let ledger = CreditRepo::list_transactions(&pool, user_id, 10, 0)
        .await
        .unwrap();
    let charge = ledger
        .iter()
        .find(|t| t.reason == reasons::TEXT_GENERATION)
        .expect("charge recorded");
    let refund = ledger
        .iter()
        .find(|t| t.reason == reasons::REFUND)
        .expect("refund recorded");
    assert_eq!(charge.amount, -1);
    assert_eq!(refund.amount, 1);
    assert_eq!(charge.reference, refund.reference);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn image_generation_without_storage_charges_nothing(pool: PgPool) {
    let (user_id, token) = new_user();

    let app = app_with_unreachable_gemini(pool.clone());
    let response = request_image(app, &token).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let ledger = CreditRepo::list_transactions(&pool, user_id, 10, 0)
        .await
        .unwrap();
    assert!(ledger.iter().all(|t| t.reason != reasons::IMAGE_GENERATION));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn blank_prompt_returns_400(pool: PgPool) {
    let (_, token) = new_user();
    let app = app_with_unreachable_gemini(pool);

    let response = post_json_auth(app, "/api/v1/ai/text", &token, json!({ "prompt": "  " })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn transactions_are_listed_newest_first(pool: PgPool) {
    let (user_id, token) = new_user();
    CreditRepo::get_current(&pool, user_id, FREE_CREDITS)
        .await
        .unwrap();
    CreditRepo::charge(&pool, user_id, 5, reasons::IMAGE_GENERATION, Some("img-1"))
        .await
        .unwrap();

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/credits/transactions", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let entries = json["data"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["reason"], reasons::IMAGE_GENERATION);
    assert_eq!(entries[0]["amount"], -5);
    assert_eq!(entries[1]["reason"], reasons::MONTHLY_REFILL);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn text_generation_debits_one_credit(pool: PgPool) {
    let (user_id, token) = new_user();
    let (app, upstream) =
        app_with_upstream(pool.clone(), vec![text_reply("Spring sale starts today")]).await;

    let response = request_text(app, &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["text"], "Spring sale starts today");
    assert_eq!(json["data"]["credits_remaining"], FREE_CREDITS - 1);
    assert_eq!(upstream.gemini_calls.count(), 1);

    let balance = CreditRepo::find_by_user(&pool, user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(balance.balance, FREE_CREDITS - 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn throttled_gemini_call_is_retried(pool: PgPool) {
    let (user_id, token) = new_user();
    let (app, upstream) = app_with_upstream(
        pool.clone(),
        vec![
            error_reply(StatusCode::TOO_MANY_REQUESTS),
            text_reply("Second time lucky"),
        ],
    )
    .await;

    let response = request_text(app, &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["data"]["text"],
        "Second time lucky"
    );
    assert_eq!(upstream.gemini_calls.count(), 2);

    let balance = CreditRepo::find_by_user(&pool, user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(balance.balance, FREE_CREDITS - 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn rejected_gemini_call_is_not_retried(pool: PgPool) {
    let (user_id, token) = new_user();
    let (app, upstream) =
        app_with_upstream(pool.clone(), vec![error_reply(StatusCode::BAD_REQUEST)]).await;

    let response = request_text(app, &token).await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["code"], "UPSTREAM_ERROR");
    assert_eq!(upstream.gemini_calls.count(), 1);

    let balance = CreditRepo::find_by_user(&pool, user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(balance.balance, FREE_CREDITS);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn image_generation_stores_media_and_debits_five_credits(pool: PgPool) {
    let (user_id, token) = new_user();
    let image = json!({ "candidates": [{ "content": { "parts": [
        { "text": "Here is your fox" },
        { "inlineData": { "mimeType": "image/png", "data": PNG_BASE64 } }
    ] } }] });
    let (app, upstream) = app_with_upstream(pool.clone(), vec![(StatusCode::OK, image)]).await;

    let response = request_image(app, &token).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["source"], "generated");
    assert_eq!(json["data"]["prompt"], "A red fox");
    assert_eq!(json["data"]["mime_type"], "image/png");
    assert_eq!(json["data"]["size_bytes"], 8);

    let paths = upstream.storage_calls.paths();
    assert_eq!(paths.len(), 1);
    assert!(
        paths[0].starts_with(&format!("/storage/v1/object/media/{user_id}/"))
    );

    let media = MediaRepo::list_for_user(&pool, user_id, None, 10, 0)
        .await
        .unwrap();
    assert_eq!(media.len(), 1);
    let balance = CreditRepo::find_by_user(&pool, user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(balance.balance, FREE_CREDITS - 5);
}
