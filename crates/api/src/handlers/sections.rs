//! Handlers for page sections. All routes are nested under a page the
//! caller owns.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use lp_core::error::CoreError;
use lp_core::sections::{validate_reorder, validate_section_type};
use lp_core::types::DbId;
use lp_db::models::page::{CreatePageSection, ReorderSections, UpdatePageSection};
use lp_db::repositories::PageSectionRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::pages::load_owned_page;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

fn section_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "PageSection",
        id,
    })
}

/// POST /api/v1/pages/{id}/sections
///
/// Appends after the last section unless `order` is given.
pub async fn create_section(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(page_id): Path<DbId>,
    Json(input): Json<CreatePageSection>,
) -> AppResult<impl IntoResponse> {
    load_owned_page(&state, &user, page_id).await?;
    validate_section_type(&input.section_type)?;
    if input.order.is_some_and(|o| o < 0) {
        return Err(AppError::BadRequest(
            "Section order must not be negative".into(),
        ));
    }

    let section = PageSectionRepo::create(&state.pool, page_id, &input).await?;

    tracing::info!(
        page_id,
        section_id = section.id,
        section_type = %section.section_type,
        "Section created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: section })))
}

/// PUT /api/v1/pages/{id}/sections/{section_id}
pub async fn update_section(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path((page_id, section_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdatePageSection>,
) -> AppResult<impl IntoResponse> {
    load_owned_page(&state, &user, page_id).await?;
    if let Some(section_type) = &input.section_type {
        validate_section_type(section_type)?;
    }

    let section = PageSectionRepo::update(&state.pool, page_id, section_id, &input)
        .await?
        .ok_or_else(|| section_not_found(section_id))?;

    Ok(Json(DataResponse { data: section }))
}

/// DELETE /api/v1/pages/{id}/sections/{section_id}
pub async fn delete_section(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path((page_id, section_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    load_owned_page(&state, &user, page_id).await?;
    if !PageSectionRepo::delete(&state.pool, page_id, section_id).await? {
        return Err(section_not_found(section_id));
    }

    tracing::info!(page_id, section_id, "Section deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/pages/{id}/sections/reorder
///
/// `section_ids` must list every section of the page exactly once.
pub async fn reorder_sections(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(page_id): Path<DbId>,
    Json(input): Json<ReorderSections>,
) -> AppResult<impl IntoResponse> {
    load_owned_page(&state, &user, page_id).await?;

    let existing: Vec<DbId> = PageSectionRepo::list_for_page(&state.pool, page_id)
        .await?
        .into_iter()
        .map(|s| s.id)
        .collect();
    validate_reorder(&existing, &input.section_ids)?;

    let sections = PageSectionRepo::reorder(&state.pool, page_id, &input.section_ids).await?;

    tracing::info!(page_id, count = sections.len(), "Sections reordered");

    Ok(Json(DataResponse { data: sections }))
}
