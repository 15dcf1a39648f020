//! Handlers for the caller's own account settings.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use lp_core::encryption::mask_secret;
use lp_core::plans::{Plan, PlanLimits};
use lp_core::types::UserId;
use lp_db::models::subscription::Subscription;
use lp_db::models::user_settings::{UpdateUserSettings, UserSettings};
use lp_db::repositories::{SubscriptionRepo, UserSettingsRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// Maximum display-name length.
const MAX_DISPLAY_NAME_LEN: usize = 80;

/// Account view returned by `GET /me`.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user_id: UserId,
    pub email: Option<String>,
    pub role: String,
    pub plan: Plan,
    pub limits: PlanLimits,
    pub display_name: Option<String>,
    pub has_gemini_api_key: bool,
    /// Masked hint of the stored key, e.g. `••••abcd`.
    pub gemini_api_key_hint: Option<String>,
    pub subscription: Option<Subscription>,
}

/// GET /api/v1/me
pub async fn get_me(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let settings = UserSettingsRepo::get_or_create(&state.pool, user.user_id).await?;
    let subscription = SubscriptionRepo::find_by_user(&state.pool, user.user_id).await?;

    let data = build_me(&state, user.email, settings, subscription);
    Ok(Json(DataResponse { data }))
}

/// PUT /api/v1/me/settings
///
/// The Gemini key is stored encrypted. `null` or `""` clears it.
pub async fn update_settings(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<UpdateUserSettings>,
) -> AppResult<impl IntoResponse> {
    let display_name = input.display_name.as_deref().map(str::trim);
    if let Some(name) = display_name {
        if name.chars().count() > MAX_DISPLAY_NAME_LEN {
            return Err(AppError::BadRequest(format!(
                "Display name must be at most {MAX_DISPLAY_NAME_LEN} characters"
            )));
        }
    }

    // Encrypt before writing anything so a missing key leaves the row as is.
    let encrypted_key = match input.gemini_api_key {
        Some(key) => match key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty()) {
            Some(plain) => Some(Some(state.encryptor()?.encrypt(&plain)?)),
            None => Some(None),
        },
        None => None,
    };

    let settings = UserSettingsRepo::update_settings(
        &state.pool,
        user.user_id,
        display_name,
        encrypted_key.as_ref().map(Option::as_deref),
    )
    .await?;

    if let Some(key) = &encrypted_key {
        tracing::info!(
            user_id = %user.user_id,
            stored = key.is_some(),
            "Gemini API key updated",
        );
    }

    let subscription = SubscriptionRepo::find_by_user(&state.pool, user.user_id).await?;
    let data = build_me(&state, user.email, settings, subscription);
    Ok(Json(DataResponse { data }))
}

fn build_me(
    state: &AppState,
    email: Option<String>,
    settings: UserSettings,
    subscription: Option<Subscription>,
) -> MeResponse {
    let plan = Plan::parse(&settings.plan).unwrap_or(Plan::Free);
    let gemini_api_key_hint = match (&settings.gemini_api_key_encrypted, &state.encryptor) {
        (Some(sealed), Some(encryptor)) => encryptor.decrypt(sealed).ok().map(|k| mask_secret(&k)),
        _ => None,
    };

    MeResponse {
        user_id: settings.user_id,
        email,
        has_gemini_api_key: settings.has_gemini_api_key(),
        gemini_api_key_hint,
        role: settings.role,
        plan,
        limits: plan.limits(),
        display_name: settings.display_name,
        subscription,
    }
}
