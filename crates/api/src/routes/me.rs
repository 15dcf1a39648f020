use axum::routing::{get, put};
use axum::Router;

use crate::handlers::me;
use crate::state::AppState;

/// Caller's account routes mounted at `/me`.
///
/// ```text
/// GET /          -> get_me
/// PUT /settings  -> update_settings
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(me::get_me))
        .route("/settings", put(me::update_settings))
}
