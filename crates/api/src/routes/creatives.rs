//! Route definitions for banners and thumbnails, which share a shape.

use axum::routing::get;
use axum::Router;

use crate::handlers::{banners, thumbnails};
use crate::state::AppState;

/// Banner routes mounted at `/banners`.
///
/// ```text
/// GET    /      -> list_banners
/// POST   /      -> create_banner
/// GET    /{id}  -> get_banner
/// PUT    /{id}  -> update_banner
/// DELETE /{id}  -> delete_banner
/// ```
pub fn banner_router() -> Router<AppState> {
    Router::new()
        .route("/", get(banners::list_banners).post(banners::create_banner))
        .route(
            "/{id}",
            get(banners::get_banner)
                .put(banners::update_banner)
                .delete(banners::delete_banner),
        )
}

/// Thumbnail routes mounted at `/thumbnails`. Same layout as banners.
pub fn thumbnail_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(thumbnails::list_thumbnails).post(thumbnails::create_thumbnail),
        )
        .route(
            "/{id}",
            get(thumbnails::get_thumbnail)
                .put(thumbnails::update_thumbnail)
                .delete(thumbnails::delete_thumbnail),
        )
}
