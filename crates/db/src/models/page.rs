//! Landing pages and their ordered sections.

use lp_core::types::{DbId, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `pages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Page {
    pub id: DbId,
    pub user_id: UserId,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub status: String,
    pub template_id: Option<DbId>,
    pub metadata: serde_json::Value,
    pub published_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `page_sections` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PageSection {
    pub id: DbId,
    pub page_id: DbId,
    pub section_type: String,
    #[serde(rename = "order")]
    pub sort_order: i32,
    pub config: serde_json::Value,
    pub image_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A page together with its sections in display order.
#[derive(Debug, Clone, Serialize)]
pub struct PageWithSections {
    #[serde(flatten)]
    pub page: Page,
    pub sections: Vec<PageSection>,
}

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

/// DTO for creating a page. The slug is derived from the title when absent.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePage {
    pub title: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub template_id: Option<DbId>,
    pub metadata: Option<serde_json::Value>,
}

/// DTO for partially updating a page. `description: null` clears it.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePage {
    pub title: Option<String>,
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "super::deserialize_some")]
    pub description: Option<Option<String>>,
    pub metadata: Option<serde_json::Value>,
}

/// DTO for appending a section. `order` defaults to after the last section.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePageSection {
    pub section_type: String,
    pub config: Option<serde_json::Value>,
    pub image_url: Option<String>,
    pub order: Option<i32>,
}

/// DTO for partially updating a section. `image_url: null` clears it.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePageSection {
    pub section_type: Option<String>,
    pub config: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "super::deserialize_some")]
    pub image_url: Option<Option<String>>,
}

/// DTO for rewriting section order.
#[derive(Debug, Clone, Deserialize)]
pub struct ReorderSections {
    pub section_ids: Vec<DbId>,
}
