//! Metered Gemini generation.
//!
//! Each call charges credits up front and refunds them if the provider call
//! (or storing its output) fails. Charge and refund share a reference so the
//! ledger pairs them.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use lp_core::credits::{reasons, CreditCost};
use lp_core::error::CoreError;
use lp_db::models::media::SOURCE_GENERATED;
use lp_db::repositories::{CreditRepo, UserSettingsRepo};
use lp_providers::gemini::TextOptions;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::media::{store_image, NewImage};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// Longest accepted prompt, in characters.
const MAX_PROMPT_LEN: usize = 4000;

#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub prompt: String,
    #[serde(default)]
    pub options: TextOptions,
}

#[derive(Debug, Deserialize)]
pub struct ImageRequest {
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct TextResponse {
    pub text: String,
    pub model: String,
    pub credits_remaining: i64,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn validate_prompt(prompt: &str) -> Result<&str, AppError> {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err(AppError::BadRequest("Prompt must not be empty".into()));
    }
    if prompt.chars().count() > MAX_PROMPT_LEN {
        return Err(AppError::BadRequest(format!(
            "Prompt must be at most {MAX_PROMPT_LEN} characters"
        )));
    }
    Ok(prompt)
}

/// The caller's own key if stored, else the platform key.
async fn resolve_api_key(state: &AppState, user: &AuthUser) -> AppResult<String> {
    let settings = UserSettingsRepo::find_by_user(&state.pool, user.user_id).await?;
    if let Some(sealed) = settings.and_then(|s| s.gemini_api_key_encrypted) {
        return Ok(state.encryptor()?.decrypt(&sealed)?);
    }
    state
        .config
        .gemini
        .platform_api_key
        .clone()
        .ok_or_else(|| CoreError::Unavailable("No Gemini API key is configured".into()).into())
}

/// Deduct `cost`, returning the balance left and the ledger reference.
async fn charge(state: &AppState, user: &AuthUser, cost: CreditCost) -> AppResult<(i64, String)> {
    let allowance = user.plan.limits().monthly_credits;
    let current = CreditRepo::get_current(&state.pool, user.user_id, allowance).await?;

    let reference = uuid::Uuid::new_v4().to_string();
    let charged = CreditRepo::charge(
        &state.pool,
        user.user_id,
        cost.amount(),
        cost.reason(),
        Some(&reference),
    )
    .await?
    .ok_or(CoreError::PaymentRequired {
        required: cost.amount(),
        available: current.balance,
    })?;

    Ok((charged.balance, reference))
}

/// Give the credits back after a failed generation.
async fn refund(state: &AppState, user: &AuthUser, cost: CreditCost, reference: &str) {
    let refunded = CreditRepo::credit(
        &state.pool,
        user.user_id,
        cost.amount(),
        reasons::REFUND,
        Some(reference),
    )
    .await;
    match refunded {
        Ok(balance) => tracing::info!(
            user_id = %user.user_id,
            amount = cost.amount(),
            balance = balance.balance,
            "Credits refunded",
        ),
        Err(e) => tracing::error!(
            user_id = %user.user_id,
            reference,
            error = %e,
            "Failed to refund credits",
        ),
    }
}

// ---------------------------------------------------------------------------
// Endpoints
// ---------------------------------------------------------------------------

/// POST /api/v1/ai/text
pub async fn generate_text(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<TextRequest>,
) -> AppResult<impl IntoResponse> {
    let prompt = validate_prompt(&input.prompt)?;
    let api_key = resolve_api_key(&state, &user).await?;

    let cost = CreditCost::Text;
    let (balance, reference) = charge(&state, &user, cost).await?;

    let result = state
        .gemini
        .generate_text(&api_key, prompt, &input.options)
        .await;
    let generated = match result {
        Ok(generated) => generated,
        Err(e) => {
            refund(&state, &user, cost, &reference).await;
            return Err(e.into());
        }
    };

    tracing::info!(
        user_id = %user.user_id,
        model = %generated.model,
        chars = generated.text.len(),
        "Text generated",
    );

    Ok(Json(DataResponse {
        data: TextResponse {
            text: generated.text,
            model: generated.model,
            credits_remaining: balance,
        },
    }))
}

/// POST /api/v1/ai/image
///
/// The image is stored in the media library with `source = generated`.
pub async fn generate_image(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<ImageRequest>,
) -> AppResult<impl IntoResponse> {
    let prompt = validate_prompt(&input.prompt)?;
    // Nowhere to put the result, so do not charge for it.
    state.storage()?;
    let api_key = resolve_api_key(&state, &user).await?;

    let cost = CreditCost::Image;
    let (_, reference) = charge(&state, &user, cost).await?;

    let generated = match state.gemini.generate_image(&api_key, prompt).await {
        Ok(generated) => generated,
        Err(e) => {
            refund(&state, &user, cost, &reference).await;
            return Err(e.into());
        }
    };

    let file_name = format!("generated-{reference}");
    let stored = store_image(
        &state,
        NewImage {
            user_id: user.user_id,
            bytes: generated.bytes,
            mime_type: &generated.mime_type,
            file_name: &file_name,
            source: SOURCE_GENERATED,
            prompt: Some(prompt),
        },
    )
    .await;
    let media = match stored {
        Ok(media) => media,
        Err(e) => {
            refund(&state, &user, cost, &reference).await;
            return Err(e);
        }
    };

    tracing::info!(
        user_id = %user.user_id,
        media_id = media.id,
        model = %generated.model,
        "Image generated",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: media })))
}
