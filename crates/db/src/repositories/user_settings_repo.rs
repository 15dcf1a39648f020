//! Repository for the `user_settings` table.

use lp_core::types::UserId;
use sqlx::{PgConnection, PgPool};

use crate::models::user_settings::UserSettings;

/// Column list for `user_settings` queries.
const COLUMNS: &str = "\
    id, user_id, role, plan, display_name, gemini_api_key_encrypted, \
    created_at, updated_at";

/// Provides data access for per-user settings.
pub struct UserSettingsRepo;

impl UserSettingsRepo {
    pub async fn find_by_user(
        pool: &PgPool,
        user_id: UserId,
    ) -> Result<Option<UserSettings>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_settings WHERE user_id = $1");
        sqlx::query_as::<_, UserSettings>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Return the user's settings, creating a default row on first access.
    ///
    /// New users start with role `user` and plan `free`.
    pub async fn get_or_create(
        pool: &PgPool,
        user_id: UserId,
    ) -> Result<UserSettings, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::get_or_create_conn(&mut conn, user_id).await
    }

    pub(crate) async fn get_or_create_conn(
        conn: &mut PgConnection,
        user_id: UserId,
    ) -> Result<UserSettings, sqlx::Error> {
        // The no-op update makes RETURNING yield the existing row on conflict.
        let query = format!(
            "INSERT INTO user_settings (user_id) VALUES ($1) \
             ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserSettings>(&query)
            .bind(user_id)
            .fetch_one(conn)
            .await
    }

    /// Apply a profile update in one statement.
    ///
    /// `display_name: None` leaves the name unchanged. `encrypted_key: None`
    /// leaves the Gemini key unchanged, `Some(None)` clears it.
    pub async fn update_settings(
        pool: &PgPool,
        user_id: UserId,
        display_name: Option<&str>,
        encrypted_key: Option<Option<&str>>,
    ) -> Result<UserSettings, sqlx::Error> {
        let query = format!(
            "UPDATE user_settings SET \
                display_name = COALESCE($2, display_name), \
                gemini_api_key_encrypted = CASE WHEN $3 THEN $4 \
                    ELSE gemini_api_key_encrypted END \
             WHERE user_id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserSettings>(&query)
            .bind(user_id)
            .bind(display_name)
            .bind(encrypted_key.is_some())
            .bind(encrypted_key.flatten())
            .fetch_one(pool)
            .await
    }

    pub async fn set_role(
        pool: &PgPool,
        user_id: UserId,
        role: &str,
    ) -> Result<UserSettings, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::get_or_create_conn(&mut conn, user_id).await?;
        let query = format!(
            "UPDATE user_settings SET role = $2 WHERE user_id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserSettings>(&query)
            .bind(user_id)
            .bind(role)
            .fetch_one(&mut *conn)
            .await
    }

    pub(crate) async fn set_plan_conn(
        conn: &mut PgConnection,
        user_id: UserId,
        plan: &str,
    ) -> Result<UserSettings, sqlx::Error> {
        Self::get_or_create_conn(conn, user_id).await?;
        let query = format!(
            "UPDATE user_settings SET plan = $2 WHERE user_id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserSettings>(&query)
            .bind(user_id)
            .bind(plan)
            .fetch_one(conn)
            .await
    }
}
