//! Handlers for landing page templates.
//!
//! Users browse active templates; admins manage the catalogue.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use lp_core::error::CoreError;
use lp_core::sections::validate_section_type;
use lp_core::types::DbId;
use lp_db::models::template::{CreateLpTemplate, TemplateSectionSeed, UpdateLpTemplate};
use lp_db::repositories::TemplateRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::query::IncludeInactiveParams;
use crate::response::DataResponse;
use crate::state::AppState;

fn template_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "LpTemplate",
        id,
    })
}

fn validate_seeds(seeds: &[TemplateSectionSeed]) -> Result<(), CoreError> {
    seeds
        .iter()
        .try_for_each(|seed| validate_section_type(&seed.section_type))
}

// ---------------------------------------------------------------------------
// User endpoints
// ---------------------------------------------------------------------------

/// GET /api/v1/templates
pub async fn list_templates(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let templates = TemplateRepo::list(&state.pool, false).await?;
    Ok(Json(DataResponse { data: templates }))
}

/// GET /api/v1/templates/{id}
///
/// Inactive templates are hidden from non-admins.
pub async fn get_template(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(template_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let template = TemplateRepo::find_by_id(&state.pool, template_id)
        .await?
        .filter(|t| t.is_active || user.is_admin())
        .ok_or_else(|| template_not_found(template_id))?;
    Ok(Json(DataResponse { data: template }))
}

// ---------------------------------------------------------------------------
// Admin endpoints
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/templates
pub async fn admin_list_templates(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<impl IntoResponse> {
    let templates = TemplateRepo::list(&state.pool, params.include_inactive).await?;
    Ok(Json(DataResponse { data: templates }))
}

/// POST /api/v1/admin/templates
pub async fn create_template(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateLpTemplate>,
) -> AppResult<impl IntoResponse> {
    if input.name.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Template name must not be empty".into(),
        ));
    }
    validate_seeds(&input.sections)?;

    let template = TemplateRepo::create(&state.pool, &input).await?;

    tracing::info!(
        template_id = template.id,
        name = %template.name,
        user_id = %admin.user_id,
        "Template created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: template })))
}

/// PUT /api/v1/admin/templates/{id}
pub async fn update_template(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(template_id): Path<DbId>,
    Json(input): Json<UpdateLpTemplate>,
) -> AppResult<impl IntoResponse> {
    if let Some(sections) = &input.sections {
        validate_seeds(sections)?;
    }

    let template = TemplateRepo::update(&state.pool, template_id, &input)
        .await?
        .ok_or_else(|| template_not_found(template_id))?;

    tracing::info!(template_id, user_id = %admin.user_id, "Template updated");

    Ok(Json(DataResponse { data: template }))
}

/// DELETE /api/v1/admin/templates/{id}
pub async fn delete_template(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(template_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !TemplateRepo::delete(&state.pool, template_id).await? {
        return Err(template_not_found(template_id));
    }

    tracing::info!(template_id, user_id = %admin.user_id, "Template deleted");

    Ok(StatusCode::NO_CONTENT)
}
