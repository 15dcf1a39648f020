use axum::routing::{get, put};
use axum::Router;

use crate::handlers::templates;
use crate::state::AppState;

/// Template catalogue mounted at `/templates`.
///
/// ```text
/// GET /      -> list_templates
/// GET /{id}  -> get_template
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(templates::list_templates))
        .route("/{id}", get(templates::get_template))
}

/// Template administration mounted at `/admin/templates`.
///
/// ```text
/// GET    /      -> admin_list_templates
/// POST   /      -> create_template
/// PUT    /{id}  -> update_template
/// DELETE /{id}  -> delete_template
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(templates::admin_list_templates).post(templates::create_template),
        )
        .route(
            "/{id}",
            put(templates::update_template).delete(templates::delete_template),
        )
}
