//! Repository for the `pages` table.

use lp_core::sections::{PAGE_STATUS_DRAFT, PAGE_STATUS_PUBLISHED};
use lp_core::types::{DbId, UserId};
use sqlx::PgPool;

use crate::models::page::{Page, UpdatePage};
use crate::models::template::TemplateSectionSeed;

/// Column list for `pages` queries.
const COLUMNS: &str = "\
    id, user_id, title, slug, description, status, template_id, metadata, \
    published_at, created_at, updated_at";

/// Insert payload with the slug already resolved.
#[derive(Debug, Clone)]
pub struct NewPage<'a> {
    pub user_id: UserId,
    pub title: &'a str,
    pub slug: &'a str,
    pub description: Option<&'a str>,
    pub template_id: Option<DbId>,
    pub metadata: serde_json::Value,
}

/// Provides CRUD operations for pages.
pub struct PageRepo;

impl PageRepo {
    /// List a user's pages, most recently edited first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: UserId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Page>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM pages WHERE user_id = $1 \
             ORDER BY updated_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Page>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count_for_user(pool: &PgPool, user_id: UserId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM pages WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Page>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pages WHERE id = $1");
        sqlx::query_as::<_, Page>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a published page by slug (public view).
    pub async fn find_published_by_slug(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<Page>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pages WHERE slug = $1 AND status = $2");
        sqlx::query_as::<_, Page>(&query)
            .bind(slug)
            .bind(PAGE_STATUS_PUBLISHED)
            .fetch_optional(pool)
            .await
    }

    pub async fn slug_exists(pool: &PgPool, slug: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM pages WHERE slug = $1)")
            .bind(slug)
            .fetch_one(pool)
            .await
    }

    /// Create a page and, when seeds are given, its initial sections
    /// (ordered 0..n) in one transaction.
    pub async fn create(
        pool: &PgPool,
        new: &NewPage<'_>,
        seeds: &[TemplateSectionSeed],
    ) -> Result<Page, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO pages (user_id, title, slug, description, template_id, metadata) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        let page = sqlx::query_as::<_, Page>(&query)
            .bind(new.user_id)
            .bind(new.title)
            .bind(new.slug)
            .bind(new.description)
            .bind(new.template_id)
            .bind(&new.metadata)
            .fetch_one(&mut *tx)
            .await?;

        for (order, seed) in seeds.iter().enumerate() {
            sqlx::query(
                "INSERT INTO page_sections (page_id, section_type, sort_order, config, image_url) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(page.id)
            .bind(&seed.section_type)
            .bind(order as i32)
            .bind(&seed.config)
            .bind(&seed.image_url)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(page)
    }

    /// Partially update a page. Uses `COALESCE` so only provided fields change;
    /// `description` is replaced whenever it is present, including with `NULL`.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        dto: &UpdatePage,
    ) -> Result<Option<Page>, sqlx::Error> {
        let query = format!(
            "UPDATE pages SET \
                 title = COALESCE($2, title), \
                 slug = COALESCE($3, slug), \
                 description = CASE WHEN $4 THEN $5 ELSE description END, \
                 metadata = COALESCE($6, metadata) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Page>(&query)
            .bind(id)
            .bind(&dto.title)
            .bind(&dto.slug)
            .bind(dto.description.is_some())
            .bind(dto.description.as_ref().and_then(Option::as_deref))
            .bind(&dto.metadata)
            .fetch_optional(pool)
            .await
    }

    /// Publish or unpublish a page.
    ///
    /// `published_at` records the first publish and is kept on unpublish.
    pub async fn set_published(
        pool: &PgPool,
        id: DbId,
        published: bool,
    ) -> Result<Option<Page>, sqlx::Error> {
        let status = if published {
            PAGE_STATUS_PUBLISHED
        } else {
            PAGE_STATUS_DRAFT
        };
        let query = format!(
            "UPDATE pages SET \
                 status = $2, \
                 published_at = CASE WHEN $3 THEN COALESCE(published_at, NOW()) ELSE published_at END \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Page>(&query)
            .bind(id)
            .bind(status)
            .bind(published)
            .fetch_optional(pool)
            .await
    }

    /// Delete a page (sections cascade). Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM pages WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
