//! Repository for the `banners` table.

use lp_core::types::{DbId, UserId};
use sqlx::PgPool;

use crate::models::banner::{Banner, CreateBanner, UpdateBanner};

/// Column list for `banners` queries.
const COLUMNS: &str = "\
    id, user_id, name, width, height, image_url, masks, metadata, created_at, updated_at";

/// Provides CRUD operations for banners.
pub struct BannerRepo;

impl BannerRepo {
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: UserId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Banner>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM banners WHERE user_id = $1 \
             ORDER BY updated_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Banner>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Banner>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM banners WHERE id = $1");
        sqlx::query_as::<_, Banner>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(
        pool: &PgPool,
        user_id: UserId,
        dto: &CreateBanner,
    ) -> Result<Banner, sqlx::Error> {
        let query = format!(
            "INSERT INTO banners (user_id, name, width, height, image_url, masks, metadata) \
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, '[]'::jsonb), COALESCE($7, '{{}}'::jsonb)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Banner>(&query)
            .bind(user_id)
            .bind(&dto.name)
            .bind(dto.width)
            .bind(dto.height)
            .bind(&dto.image_url)
            .bind(&dto.masks)
            .bind(&dto.metadata)
            .fetch_one(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        dto: &UpdateBanner,
    ) -> Result<Option<Banner>, sqlx::Error> {
        let query = format!(
            "UPDATE banners SET \
                 name = COALESCE($2, name), \
                 width = COALESCE($3, width), \
                 height = COALESCE($4, height), \
                 image_url = CASE WHEN $5 THEN $6 ELSE image_url END, \
                 masks = COALESCE($7, masks), \
                 metadata = COALESCE($8, metadata) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Banner>(&query)
            .bind(id)
            .bind(&dto.name)
            .bind(dto.width)
            .bind(dto.height)
            .bind(dto.image_url.is_some())
            .bind(dto.image_url.as_ref().and_then(Option::as_deref))
            .bind(&dto.masks)
            .bind(&dto.metadata)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM banners WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
