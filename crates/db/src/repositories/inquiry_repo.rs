//! Repository for the `contact_inquiries` table.

use lp_core::types::{DbId, UserId};
use sqlx::PgPool;

use crate::models::inquiry::{ContactInquiry, CreateContactInquiry, UpdateContactInquiry};

/// Column list for `contact_inquiries` queries.
const COLUMNS: &str = "\
    id, user_id, name, email, subject, message, status, admin_note, created_at, updated_at";

/// Provides CRUD operations for contact inquiries.
pub struct InquiryRepo;

impl InquiryRepo {
    /// Store a submission. Text fields are trimmed on the way in.
    pub async fn create(
        pool: &PgPool,
        dto: &CreateContactInquiry,
        user_id: Option<UserId>,
    ) -> Result<ContactInquiry, sqlx::Error> {
        let query = format!(
            "INSERT INTO contact_inquiries (user_id, name, email, subject, message) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContactInquiry>(&query)
            .bind(user_id)
            .bind(dto.name.trim())
            .bind(dto.email.trim())
            .bind(dto.subject.as_deref().map(str::trim))
            .bind(dto.message.trim())
            .fetch_one(pool)
            .await
    }

    /// List inquiries, newest first, optionally filtered by status.
    pub async fn list(
        pool: &PgPool,
        status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ContactInquiry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM contact_inquiries \
             WHERE ($1::TEXT IS NULL OR status = $1) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, ContactInquiry>(&query)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ContactInquiry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM contact_inquiries WHERE id = $1");
        sqlx::query_as::<_, ContactInquiry>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        dto: &UpdateContactInquiry,
    ) -> Result<Option<ContactInquiry>, sqlx::Error> {
        let query = format!(
            "UPDATE contact_inquiries SET \
                 status = COALESCE($2, status), \
                 admin_note = COALESCE($3, admin_note) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContactInquiry>(&query)
            .bind(id)
            .bind(&dto.status)
            .bind(&dto.admin_note)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM contact_inquiries WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
