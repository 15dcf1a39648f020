//! Route definitions for pages and their sections.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{pages, sections};
use crate::state::AppState;

/// Owner routes mounted at `/pages`.
///
/// ```text
/// GET    /                               -> list_pages
/// POST   /                               -> create_page
/// GET    /{id}                           -> get_page
/// PUT    /{id}                           -> update_page
/// DELETE /{id}                           -> delete_page
/// POST   /{id}/publish                   -> publish_page
/// POST   /{id}/unpublish                 -> unpublish_page
/// GET    /{id}/export                    -> export_page
/// POST   /{id}/sections                  -> create_section
/// PUT    /{id}/sections/reorder          -> reorder_sections
/// PUT    /{id}/sections/{section_id}     -> update_section
/// DELETE /{id}/sections/{section_id}     -> delete_section
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::list_pages).post(pages::create_page))
        .route(
            "/{id}",
            get(pages::get_page)
                .put(pages::update_page)
                .delete(pages::delete_page),
        )
        .route("/{id}/publish", post(pages::publish_page))
        .route("/{id}/unpublish", post(pages::unpublish_page))
        .route("/{id}/export", get(pages::export_page))
        .route("/{id}/sections", post(sections::create_section))
        .route("/{id}/sections/reorder", put(sections::reorder_sections))
        .route(
            "/{id}/sections/{section_id}",
            put(sections::update_section).delete(sections::delete_section),
        )
}

/// Anonymous routes mounted at `/public/pages`.
///
/// ```text
/// GET /{slug} -> get_public_page
/// ```
pub fn public_router() -> Router<AppState> {
    Router::new().route("/{slug}", get(pages::get_public_page))
}
