use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::media;
use crate::state::AppState;

/// Media library routes mounted at `/media`.
///
/// ```text
/// GET    /      -> list_media
/// POST   /      -> upload_media (multipart)
/// DELETE /{id}  -> delete_media
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(media::list_media).post(media::upload_media))
        .route("/{id}", delete(media::delete_media))
}
