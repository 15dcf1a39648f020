//! Handlers for marketing banners.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use lp_core::error::CoreError;
use lp_core::types::DbId;
use lp_db::models::banner::{Banner, CreateBanner, UpdateBanner};
use lp_db::repositories::BannerRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::creatives::validate_canvas;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAuth;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

async fn load_owned(state: &AppState, user: &AuthUser, id: DbId) -> AppResult<Banner> {
    let banner = BannerRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Banner",
            id,
        }))?;
    user.ensure_owns(banner.user_id)?;
    Ok(banner)
}

/// GET /api/v1/banners
pub async fn list_banners(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let (limit, offset) = params.resolve();
    let banners = BannerRepo::list_for_user(&state.pool, user.user_id, limit, offset).await?;
    Ok(Json(DataResponse { data: banners }))
}

/// POST /api/v1/banners
pub async fn create_banner(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<CreateBanner>,
) -> AppResult<impl IntoResponse> {
    validate_canvas(&input.name, Some(input.width), Some(input.height))?;
    let banner = BannerRepo::create(&state.pool, user.user_id, &input).await?;

    tracing::info!(banner_id = banner.id, user_id = %user.user_id, "Banner created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: banner })))
}

/// GET /api/v1/banners/{id}
pub async fn get_banner(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(banner_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let banner = load_owned(&state, &user, banner_id).await?;
    Ok(Json(DataResponse { data: banner }))
}

/// PUT /api/v1/banners/{id}
pub async fn update_banner(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(banner_id): Path<DbId>,
    Json(input): Json<UpdateBanner>,
) -> AppResult<impl IntoResponse> {
    let current = load_owned(&state, &user, banner_id).await?;
    validate_canvas(
        input.name.as_deref().unwrap_or(&current.name),
        input.width,
        input.height,
    )?;

    let banner = BannerRepo::update(&state.pool, banner_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Banner",
            id: banner_id,
        }))?;
    Ok(Json(DataResponse { data: banner }))
}

/// DELETE /api/v1/banners/{id}
pub async fn delete_banner(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(banner_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    load_owned(&state, &user, banner_id).await?;
    BannerRepo::delete(&state.pool, banner_id).await?;

    tracing::info!(banner_id, user_id = %user.user_id, "Banner deleted");

    Ok(StatusCode::NO_CONTENT)
}
