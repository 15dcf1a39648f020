//! Admin account tooling: inspect a user, grant plans, set roles, adjust
//! credits.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use lp_core::credits::reasons;
use lp_core::error::CoreError;
use lp_core::plans::Plan;
use lp_core::roles::validate_role;
use lp_core::types::UserId;
use lp_db::models::credit::{AdjustCredits, CreditBalance};
use lp_db::models::subscription::Subscription;
use lp_db::models::user_settings::UserSettings;
use lp_db::repositories::{AccountRepo, CreditRepo, SubscriptionRepo, UserSettingsRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UserAccount {
    pub settings: UserSettings,
    pub subscription: Option<Subscription>,
    pub credits: Option<CreditBalance>,
}

#[derive(Debug, Deserialize)]
pub struct SetPlanRequest {
    pub plan: String,
}

#[derive(Debug, Deserialize)]
pub struct SetRoleRequest {
    pub role: String,
}

/// GET /api/v1/admin/users/{user_id}
pub async fn get_user(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> AppResult<impl IntoResponse> {
    let settings = UserSettingsRepo::find_by_user(&state.pool, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No account for user {user_id}")))?;
    let subscription = SubscriptionRepo::find_by_user(&state.pool, user_id).await?;
    let credits = CreditRepo::find_by_user(&state.pool, user_id).await?;

    Ok(Json(DataResponse {
        data: UserAccount {
            settings,
            subscription,
            credits,
        },
    }))
}

/// PUT /api/v1/admin/users/{user_id}/plan
///
/// Same operation as the `lp-grant-plan` binary.
pub async fn set_plan(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Json(input): Json<SetPlanRequest>,
) -> AppResult<impl IntoResponse> {
    let plan = Plan::parse(&input.plan)?;
    let account = AccountRepo::grant_plan(&state.pool, user_id, plan).await?;

    tracing::info!(
        %user_id,
        plan = %plan,
        admin_id = %admin.user_id,
        "Plan granted by admin",
    );

    Ok(Json(DataResponse { data: account }))
}

/// PUT /api/v1/admin/users/{user_id}/role
pub async fn set_role(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Json(input): Json<SetRoleRequest>,
) -> AppResult<impl IntoResponse> {
    validate_role(&input.role)?;
    if user_id == admin.user_id && input.role != admin.role {
        return Err(AppError::BadRequest(
            "You cannot change your own role".into(),
        ));
    }

    let settings = UserSettingsRepo::set_role(&state.pool, user_id, &input.role).await?;

    tracing::info!(
        %user_id,
        role = %settings.role,
        admin_id = %admin.user_id,
        "Role updated",
    );

    Ok(Json(DataResponse { data: settings }))
}

/// POST /api/v1/admin/users/{user_id}/credits
///
/// Signed adjustment; the resulting balance may not be negative.
pub async fn adjust_credits(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Json(input): Json<AdjustCredits>,
) -> AppResult<impl IntoResponse> {
    if input.amount == 0 {
        return Err(AppError::BadRequest("Amount must not be zero".into()));
    }

    let settings = UserSettingsRepo::get_or_create(&state.pool, user_id).await?;
    let plan = Plan::parse(&settings.plan)?;
    let current =
        CreditRepo::get_current(&state.pool, user_id, plan.limits().monthly_credits).await?;
    let adjusted = current
        .balance
        .checked_add(input.amount)
        .ok_or_else(|| AppError::BadRequest("Adjustment amount is out of range".into()))?;
    if adjusted < 0 {
        return Err(CoreError::Validation(format!(
            "Adjustment would make the balance negative (current balance {})",
            current.balance
        ))
        .into());
    }

    let balance = CreditRepo::credit(
        &state.pool,
        user_id,
        input.amount,
        reasons::ADMIN_ADJUSTMENT,
        input.note.as_deref(),
    )
    .await?;

    tracing::info!(
        %user_id,
        amount = input.amount,
        balance = balance.balance,
        admin_id = %admin.user_id,
        "Credits adjusted",
    );

    Ok(Json(DataResponse { data: balance }))
}
