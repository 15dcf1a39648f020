//! Repository for the `page_sections` table.
//!
//! Sections are always read in `sort_order, id` order.

use lp_core::types::DbId;
use sqlx::PgPool;

use crate::models::page::{CreatePageSection, PageSection, UpdatePageSection};

/// Column list for `page_sections` queries.
const COLUMNS: &str = "\
    id, page_id, section_type, sort_order, config, image_url, created_at, updated_at";

/// Provides CRUD and ordering operations for page sections.
pub struct PageSectionRepo;

impl PageSectionRepo {
    pub async fn list_for_page(
        pool: &PgPool,
        page_id: DbId,
    ) -> Result<Vec<PageSection>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM page_sections WHERE page_id = $1 \
             ORDER BY sort_order, id"
        );
        sqlx::query_as::<_, PageSection>(&query)
            .bind(page_id)
            .fetch_all(pool)
            .await
    }

    /// Find a section that belongs to `page_id`.
    pub async fn find(
        pool: &PgPool,
        page_id: DbId,
        id: DbId,
    ) -> Result<Option<PageSection>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM page_sections WHERE id = $1 AND page_id = $2");
        sqlx::query_as::<_, PageSection>(&query)
            .bind(id)
            .bind(page_id)
            .fetch_optional(pool)
            .await
    }

    /// Append a section. Without an explicit `order` it goes after the
    /// current last section.
    pub async fn create(
        pool: &PgPool,
        page_id: DbId,
        dto: &CreatePageSection,
    ) -> Result<PageSection, sqlx::Error> {
        let query = format!(
            "INSERT INTO page_sections (page_id, section_type, sort_order, config, image_url) \
             VALUES ( \
                 $1, $2, \
                 COALESCE($3, (SELECT COALESCE(MAX(sort_order) + 1, 0) FROM page_sections WHERE page_id = $1)), \
                 COALESCE($4, '{{}}'::jsonb), \
                 $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PageSection>(&query)
            .bind(page_id)
            .bind(&dto.section_type)
            .bind(dto.order)
            .bind(&dto.config)
            .bind(&dto.image_url)
            .fetch_one(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        page_id: DbId,
        id: DbId,
        dto: &UpdatePageSection,
    ) -> Result<Option<PageSection>, sqlx::Error> {
        let query = format!(
            "UPDATE page_sections SET \
                 section_type = COALESCE($3, section_type), \
                 config = COALESCE($4, config), \
                 image_url = CASE WHEN $5 THEN $6 ELSE image_url END \
             WHERE id = $1 AND page_id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PageSection>(&query)
            .bind(id)
            .bind(page_id)
            .bind(&dto.section_type)
            .bind(&dto.config)
            .bind(dto.image_url.is_some())
            .bind(dto.image_url.as_ref().and_then(Option::as_deref))
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, page_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM page_sections WHERE id = $1 AND page_id = $2")
            .bind(id)
            .bind(page_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Rewrite `sort_order` to match the position of each id in `ordered_ids`
    /// (0-based), then return the sections in their new order.
    ///
    /// Callers validate that `ordered_ids` is a permutation of the page's
    /// sections first.
    pub async fn reorder(
        pool: &PgPool,
        page_id: DbId,
        ordered_ids: &[DbId],
    ) -> Result<Vec<PageSection>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        for (position, id) in ordered_ids.iter().enumerate() {
            sqlx::query("UPDATE page_sections SET sort_order = $3 WHERE id = $1 AND page_id = $2")
                .bind(id)
                .bind(page_id)
                .bind(position as i32)
                .execute(&mut *tx)
                .await?;
        }

        let query = format!(
            "SELECT {COLUMNS} FROM page_sections WHERE page_id = $1 \
             ORDER BY sort_order, id"
        );
        let sections = sqlx::query_as::<_, PageSection>(&query)
            .bind(page_id)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(sections)
    }
}
