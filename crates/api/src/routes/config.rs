use axum::routing::{get, put};
use axum::Router;

use crate::handlers::config;
use crate::state::AppState;

/// Config reads mounted at `/config`.
///
/// ```text
/// GET /{key} -> get_config
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{key}", get(config::get_config))
}

/// Config administration mounted at `/admin/config`.
///
/// ```text
/// GET    /      -> list_configs
/// PUT    /{key} -> upsert_config
/// DELETE /{key} -> delete_config
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(config::list_configs))
        .route(
            "/{key}",
            put(config::upsert_config).delete(config::delete_config),
        )
}
