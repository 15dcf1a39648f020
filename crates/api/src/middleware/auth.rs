//! Supabase-session authentication extractor for Axum handlers.

use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::request::Parts;
use lp_core::error::CoreError;
use lp_core::plans::Plan;
use lp_core::roles::ROLE_ADMIN;
use lp_core::types::UserId;
use lp_db::repositories::UserSettingsRepo;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a Bearer token in the `Authorization`
/// header.
///
/// The token only proves identity. Role and plan are read from
/// `user_settings`, which is created on the user's first request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Supabase user id (from `claims.sub`).
    pub user_id: UserId,
    pub email: Option<String>,
    /// App role (`"user"` or `"admin"`).
    pub role: String,
    pub plan: Plan,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }

    /// Allow access to a row owned by `owner_id`. Admins may access any row.
    pub fn ensure_owns(&self, owner_id: UserId) -> Result<(), CoreError> {
        if self.user_id == owner_id || self.is_admin() {
            Ok(())
        } else {
            Err(CoreError::Forbidden(
                "You do not have access to this resource".into(),
            ))
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        let settings = UserSettingsRepo::get_or_create(&state.pool, claims.sub).await?;
        let plan = Plan::parse(&settings.plan)?;

        Ok(AuthUser {
            user_id: claims.sub,
            email: claims.email,
            role: settings.role,
            plan,
        })
    }
}

/// Public routes accept an optional session: no `Authorization` header means
/// anonymous, but a header that is present must still be valid.
impl OptionalFromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        if !parts.headers.contains_key("authorization") {
            return Ok(None);
        }
        <AuthUser as FromRequestParts<AppState>>::from_request_parts(parts, state)
            .await
            .map(Some)
    }
}
