//! Handlers for the contact form and its admin inbox.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use lp_core::error::CoreError;
use lp_core::inquiry::{validate_status, validate_submission};
use lp_core::types::DbId;
use lp_db::models::inquiry::{CreateContactInquiry, UpdateContactInquiry};
use lp_db::repositories::InquiryRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Longest accepted subject line.
const MAX_SUBJECT_LEN: usize = 200;

fn inquiry_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "ContactInquiry",
        id,
    })
}

/// Query parameters for the admin inbox.
#[derive(Debug, Deserialize)]
pub struct InquiryListParams {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// POST /api/v1/inquiries
///
/// Public. A valid session, when present, links the inquiry to the user.
pub async fn submit_inquiry(
    user: Option<AuthUser>,
    State(state): State<AppState>,
    Json(input): Json<CreateContactInquiry>,
) -> AppResult<impl IntoResponse> {
    validate_submission(&input.name, &input.email, &input.message)?;
    if input
        .subject
        .as_deref()
        .is_some_and(|s| s.chars().count() > MAX_SUBJECT_LEN)
    {
        return Err(AppError::BadRequest(format!(
            "Subject must be at most {MAX_SUBJECT_LEN} characters"
        )));
    }

    let user_id = user.map(|u| u.user_id);
    let inquiry = InquiryRepo::create(&state.pool, &input, user_id).await?;

    tracing::info!(
        inquiry_id = inquiry.id,
        signed_in = user_id.is_some(),
        "Inquiry received"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: inquiry })))
}

/// GET /api/v1/admin/inquiries
pub async fn list_inquiries(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<InquiryListParams>,
) -> AppResult<impl IntoResponse> {
    if let Some(status) = &params.status {
        validate_status(status)?;
    }
    let (limit, offset) = PaginationParams {
        limit: params.limit,
        offset: params.offset,
    }
    .resolve();

    let inquiries =
        InquiryRepo::list(&state.pool, params.status.as_deref(), limit, offset).await?;
    Ok(Json(DataResponse { data: inquiries }))
}

/// GET /api/v1/admin/inquiries/{id}
pub async fn get_inquiry(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(inquiry_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let inquiry = InquiryRepo::find_by_id(&state.pool, inquiry_id)
        .await?
        .ok_or_else(|| inquiry_not_found(inquiry_id))?;
    Ok(Json(DataResponse { data: inquiry }))
}

/// PATCH /api/v1/admin/inquiries/{id}
pub async fn update_inquiry(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(inquiry_id): Path<DbId>,
    Json(input): Json<UpdateContactInquiry>,
) -> AppResult<impl IntoResponse> {
    if let Some(status) = &input.status {
        validate_status(status)?;
    }

    let inquiry = InquiryRepo::update(&state.pool, inquiry_id, &input)
        .await?
        .ok_or_else(|| inquiry_not_found(inquiry_id))?;

    tracing::info!(
        inquiry_id,
        status = %inquiry.status,
        user_id = %admin.user_id,
        "Inquiry updated",
    );

    Ok(Json(DataResponse { data: inquiry }))
}

/// DELETE /api/v1/admin/inquiries/{id}
pub async fn delete_inquiry(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(inquiry_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !InquiryRepo::delete(&state.pool, inquiry_id).await? {
        return Err(inquiry_not_found(inquiry_id));
    }

    tracing::info!(inquiry_id, user_id = %admin.user_id, "Inquiry deleted");

    Ok(StatusCode::NO_CONTENT)
}
