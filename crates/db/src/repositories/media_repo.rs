//! Repository for the `media_images` table.

use lp_core::types::{DbId, UserId};
use sqlx::PgPool;

use crate::models::media::{CreateMediaImage, MediaImage};

/// Column list for `media_images` queries.
const COLUMNS: &str = "\
    id, user_id, storage_path, public_url, file_name, mime_type, size_bytes, \
    source, prompt, created_at, updated_at";

/// Provides CRUD operations for media images.
pub struct MediaRepo;

impl MediaRepo {
    /// List a user's images, newest first, optionally filtered by source.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: UserId,
        source: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<MediaImage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM media_images \
             WHERE user_id = $1 AND ($2::TEXT IS NULL OR source = $2) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, MediaImage>(&query)
            .bind(user_id)
            .bind(source)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<MediaImage>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM media_images WHERE id = $1");
        sqlx::query_as::<_, MediaImage>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(pool: &PgPool, dto: &CreateMediaImage) -> Result<MediaImage, sqlx::Error> {
        let query = format!(
            "INSERT INTO media_images \
                 (user_id, storage_path, public_url, file_name, mime_type, size_bytes, source, prompt) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MediaImage>(&query)
            .bind(dto.user_id)
            .bind(&dto.storage_path)
            .bind(&dto.public_url)
            .bind(&dto.file_name)
            .bind(&dto.mime_type)
            .bind(dto.size_bytes)
            .bind(&dto.source)
            .bind(&dto.prompt)
            .fetch_one(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM media_images WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
