//! Route definitions for credits, billing, and metered AI generation.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{ai, billing, credits};
use crate::state::AppState;

/// Credit routes mounted at `/credits`.
///
/// ```text
/// GET /              -> get_summary
/// GET /transactions  -> list_transactions
/// ```
pub fn credits_router() -> Router<AppState> {
    Router::new()
        .route("/", get(credits::get_summary))
        .route("/transactions", get(credits::list_transactions))
}

/// Stripe routes mounted at `/billing`.
///
/// ```text
/// POST /checkout  -> create_checkout
/// POST /portal    -> create_portal
/// POST /webhook   -> webhook (Stripe signature, no session)
/// ```
pub fn billing_router() -> Router<AppState> {
    Router::new()
        .route("/checkout", post(billing::create_checkout))
        .route("/portal", post(billing::create_portal))
        .route("/webhook", post(billing::webhook))
}

/// Generation routes mounted at `/ai`.
///
/// ```text
/// POST /text   -> generate_text  (1 credit)
/// POST /image  -> generate_image (5 credits)
/// ```
pub fn ai_router() -> Router<AppState> {
    Router::new()
        .route("/text", post(ai::generate_text))
        .route("/image", post(ai::generate_image))
}
