//! Images stored in object storage (uploads and AI generations).

use lp_core::types::{DbId, Timestamp, UserId};
use serde::Serialize;
use sqlx::FromRow;

pub const SOURCE_UPLOAD: &str = "upload";
pub const SOURCE_GENERATED: &str = "generated";

/// A row from the `media_images` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MediaImage {
    pub id: DbId,
    pub user_id: UserId,
    pub storage_path: String,
    pub public_url: String,
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub source: String,
    pub prompt: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert payload, built by handlers after the object is stored.
#[derive(Debug, Clone)]
pub struct CreateMediaImage {
    pub user_id: UserId,
    pub storage_path: String,
    pub public_url: String,
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub source: String,
    pub prompt: Option<String>,
}
