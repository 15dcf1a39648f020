//! Repository for the `lp_templates` table.

use lp_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::template::{CreateLpTemplate, LpTemplate, UpdateLpTemplate};

/// Column list for `lp_templates` queries.
const COLUMNS: &str = "\
    id, name, category, description, sections, thumbnail_url, is_active, \
    created_at, updated_at";

/// Provides CRUD operations for landing page templates.
pub struct TemplateRepo;

impl TemplateRepo {
    /// List templates ordered by category and name.
    ///
    /// Inactive templates are included only when `include_inactive` is set.
    pub async fn list(
        pool: &PgPool,
        include_inactive: bool,
    ) -> Result<Vec<LpTemplate>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM lp_templates \
             WHERE is_active OR $1 \
             ORDER BY category, name"
        );
        sqlx::query_as::<_, LpTemplate>(&query)
            .bind(include_inactive)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<LpTemplate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM lp_templates WHERE id = $1");
        sqlx::query_as::<_, LpTemplate>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(pool: &PgPool, dto: &CreateLpTemplate) -> Result<LpTemplate, sqlx::Error> {
        let query = format!(
            "INSERT INTO lp_templates (name, category, description, sections, thumbnail_url) \
             VALUES ($1, COALESCE($2, 'general'), $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LpTemplate>(&query)
            .bind(&dto.name)
            .bind(&dto.category)
            .bind(&dto.description)
            .bind(Json(&dto.sections))
            .bind(&dto.thumbnail_url)
            .fetch_one(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        dto: &UpdateLpTemplate,
    ) -> Result<Option<LpTemplate>, sqlx::Error> {
        let query = format!(
            "UPDATE lp_templates SET \
                 name = COALESCE($2, name), \
                 category = COALESCE($3, category), \
                 description = COALESCE($4, description), \
                 sections = COALESCE($5, sections), \
                 thumbnail_url = COALESCE($6, thumbnail_url), \
                 is_active = COALESCE($7, is_active) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LpTemplate>(&query)
            .bind(id)
            .bind(&dto.name)
            .bind(&dto.category)
            .bind(&dto.description)
            .bind(dto.sections.as_ref().map(Json))
            .bind(&dto.thumbnail_url)
            .bind(dto.is_active)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM lp_templates WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
