//! Handlers for video/social thumbnails.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use lp_core::error::CoreError;
use lp_core::types::DbId;
use lp_db::models::thumbnail::{CreateThumbnail, Thumbnail, UpdateThumbnail};
use lp_db::repositories::ThumbnailRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::creatives::validate_canvas;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAuth;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

async fn load_owned(state: &AppState, user: &AuthUser, id: DbId) -> AppResult<Thumbnail> {
    let thumbnail = ThumbnailRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Thumbnail",
            id,
        }))?;
    user.ensure_owns(thumbnail.user_id)?;
    Ok(thumbnail)
}

/// GET /api/v1/thumbnails
pub async fn list_thumbnails(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let (limit, offset) = params.resolve();
    let thumbnails = ThumbnailRepo::list_for_user(&state.pool, user.user_id, limit, offset).await?;
    Ok(Json(DataResponse { data: thumbnails }))
}

/// POST /api/v1/thumbnails
///
/// Size defaults to 1280x720 when omitted.
pub async fn create_thumbnail(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<CreateThumbnail>,
) -> AppResult<impl IntoResponse> {
    validate_canvas(&input.name, input.width, input.height)?;
    let thumbnail = ThumbnailRepo::create(&state.pool, user.user_id, &input).await?;

    tracing::info!(
        thumbnail_id = thumbnail.id,
        platform = %thumbnail.platform,
        user_id = %user.user_id,
        "Thumbnail created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: thumbnail })))
}

/// GET /api/v1/thumbnails/{id}
pub async fn get_thumbnail(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(thumbnail_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let thumbnail = load_owned(&state, &user, thumbnail_id).await?;
    Ok(Json(DataResponse { data: thumbnail }))
}

/// PUT /api/v1/thumbnails/{id}
pub async fn update_thumbnail(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(thumbnail_id): Path<DbId>,
    Json(input): Json<UpdateThumbnail>,
) -> AppResult<impl IntoResponse> {
    let current = load_owned(&state, &user, thumbnail_id).await?;
    validate_canvas(
        input.name.as_deref().unwrap_or(&current.name),
        input.width,
        input.height,
    )?;

    let thumbnail = ThumbnailRepo::update(&state.pool, thumbnail_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Thumbnail",
            id: thumbnail_id,
        }))?;
    Ok(Json(DataResponse { data: thumbnail }))
}

/// DELETE /api/v1/thumbnails/{id}
pub async fn delete_thumbnail(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(thumbnail_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    load_owned(&state, &user, thumbnail_id).await?;
    ThumbnailRepo::delete(&state.pool, thumbnail_id).await?;

    tracing::info!(thumbnail_id, user_id = %user.user_id, "Thumbnail deleted");

    Ok(StatusCode::NO_CONTENT)
}
