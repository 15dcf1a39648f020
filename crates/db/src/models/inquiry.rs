//! Contact form inquiries.

use lp_core::types::{DbId, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `contact_inquiries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ContactInquiry {
    pub id: DbId,
    pub user_id: Option<UserId>,
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
    pub status: String,
    pub admin_note: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for the public contact form.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateContactInquiry {
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
}

/// DTO for admin triage.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateContactInquiry {
    pub status: Option<String>,
    pub admin_note: Option<String>,
}
