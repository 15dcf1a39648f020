//! Repository for the `thumbnails` table.

use lp_core::types::{DbId, UserId};
use sqlx::PgPool;

use crate::models::thumbnail::{CreateThumbnail, Thumbnail, UpdateThumbnail};

/// Column list for `thumbnails` queries.
const COLUMNS: &str = "\
    id, user_id, name, platform, width, height, image_url, masks, metadata, \
    created_at, updated_at";

/// Default canvas for a new thumbnail (16:9 HD).
pub const DEFAULT_WIDTH: i32 = 1280;
pub const DEFAULT_HEIGHT: i32 = 720;

/// Provides CRUD operations for thumbnails.
pub struct ThumbnailRepo;

impl ThumbnailRepo {
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: UserId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Thumbnail>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM thumbnails WHERE user_id = $1 \
             ORDER BY updated_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Thumbnail>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Thumbnail>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM thumbnails WHERE id = $1");
        sqlx::query_as::<_, Thumbnail>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(
        pool: &PgPool,
        user_id: UserId,
        dto: &CreateThumbnail,
    ) -> Result<Thumbnail, sqlx::Error> {
        let query = format!(
            "INSERT INTO thumbnails (user_id, name, platform, width, height, image_url, masks, metadata) \
             VALUES ($1, $2, COALESCE($3, 'youtube'), $4, $5, $6, \
                     COALESCE($7, '[]'::jsonb), COALESCE($8, '{{}}'::jsonb)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Thumbnail>(&query)
            .bind(user_id)
            .bind(&dto.name)
            .bind(&dto.platform)
            .bind(dto.width.unwrap_or(DEFAULT_WIDTH))
            .bind(dto.height.unwrap_or(DEFAULT_HEIGHT))
            .bind(&dto.image_url)
            .bind(&dto.masks)
            .bind(&dto.metadata)
            .fetch_one(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        dto: &UpdateThumbnail,
    ) -> Result<Option<Thumbnail>, sqlx::Error> {
        let query = format!(
            "UPDATE thumbnails SET \
                 name = COALESCE($2, name), \
                 platform = COALESCE($3, platform), \
                 width = COALESCE($4, width), \
                 height = COALESCE($5, height), \
                 image_url = CASE WHEN $6 THEN $7 ELSE image_url END, \
                 masks = COALESCE($8, masks), \
                 metadata = COALESCE($9, metadata) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Thumbnail>(&query)
            .bind(id)
            .bind(&dto.name)
            .bind(&dto.platform)
            .bind(dto.width)
            .bind(dto.height)
            .bind(dto.image_url.is_some())
            .bind(dto.image_url.as_deref())
            .bind(&dto.masks)
            .bind(&dto.metadata)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM thumbnails WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
