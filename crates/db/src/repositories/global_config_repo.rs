//! Repository for the `global_configs` key/value table.

use sqlx::PgPool;

use crate::models::global_config::{GlobalConfig, UpsertGlobalConfig};

/// Column list for `global_configs` queries.
const COLUMNS: &str = "id, key, value, description, created_at, updated_at";

/// Provides data access for global configuration entries.
pub struct GlobalConfigRepo;

impl GlobalConfigRepo {
    pub async fn list(pool: &PgPool) -> Result<Vec<GlobalConfig>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM global_configs ORDER BY key");
        sqlx::query_as::<_, GlobalConfig>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn get(pool: &PgPool, key: &str) -> Result<Option<GlobalConfig>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM global_configs WHERE key = $1");
        sqlx::query_as::<_, GlobalConfig>(&query)
            .bind(key)
            .fetch_optional(pool)
            .await
    }

    /// Insert or replace a value. The description is kept when omitted.
    pub async fn upsert(
        pool: &PgPool,
        key: &str,
        dto: &UpsertGlobalConfig,
    ) -> Result<GlobalConfig, sqlx::Error> {
        let query = format!(
            "INSERT INTO global_configs (key, value, description) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (key) DO UPDATE SET \
                 value = EXCLUDED.value, \
                 description = COALESCE(EXCLUDED.description, global_configs.description) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GlobalConfig>(&query)
            .bind(key)
            .bind(&dto.value)
            .bind(&dto.description)
            .fetch_one(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, key: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM global_configs WHERE key = $1")
            .bind(key)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
