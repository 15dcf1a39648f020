use axum::routing::{get, post};
use axum::Router;

use crate::handlers::inquiries;
use crate::state::AppState;

/// Public contact form mounted at `/inquiries`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(inquiries::submit_inquiry))
}

/// Inbox mounted at `/admin/inquiries`.
///
/// ```text
/// GET    /      -> list_inquiries
/// GET    /{id}  -> get_inquiry
/// PATCH  /{id}  -> update_inquiry
/// DELETE /{id}  -> delete_inquiry
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(inquiries::list_inquiries))
        .route(
            "/{id}",
            get(inquiries::get_inquiry)
                .patch(inquiries::update_inquiry)
                .delete(inquiries::delete_inquiry),
        )
}
