//! Handlers for global key/value configuration.
//!
//! Any signed-in user may read a single key; listing and writes are
//! admin-only.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use lp_core::error::CoreError;
use lp_db::models::global_config::UpsertGlobalConfig;
use lp_db::repositories::GlobalConfigRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

/// Longest accepted config key.
const MAX_KEY_LEN: usize = 100;

/// GET /api/v1/config/{key}
pub async fn get_config(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> AppResult<impl IntoResponse> {
    let entry = GlobalConfigRepo::get(&state.pool, &key)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Config key '{key}' is not set")))?;

    Ok(Json(DataResponse { data: entry }))
}

/// GET /api/v1/admin/config
pub async fn list_configs(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let entries = GlobalConfigRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// PUT /api/v1/admin/config/{key}
pub async fn upsert_config(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(input): Json<UpsertGlobalConfig>,
) -> AppResult<impl IntoResponse> {
    validate_key(&key)?;
    let entry = GlobalConfigRepo::upsert(&state.pool, &key, &input).await?;

    tracing::info!(key = %entry.key, user_id = %admin.user_id, "Global config updated");

    Ok(Json(DataResponse { data: entry }))
}

/// DELETE /api/v1/admin/config/{key}
pub async fn delete_config(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> AppResult<impl IntoResponse> {
    if !GlobalConfigRepo::delete(&state.pool, &key).await? {
        return Err(AppError::NotFound(format!("Config key '{key}' is not set")));
    }

    tracing::info!(%key, user_id = %admin.user_id, "Global config deleted");

    Ok(StatusCode::NO_CONTENT)
}

fn validate_key(key: &str) -> Result<(), CoreError> {
    let valid = !key.is_empty()
        && key.len() <= MAX_KEY_LEN
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Config keys must be 1-{MAX_KEY_LEN} characters of [A-Za-z0-9_.-]"
        )))
    }
}
