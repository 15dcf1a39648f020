//! Admin-curated landing page templates.

use lp_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `lp_templates` table.
///
/// `sections` is a JSON array of section seeds, each shaped like
/// `{"section_type": "...", "config": {...}, "image_url": "..."}`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LpTemplate {
    pub id: DbId,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub sections: serde_json::Value,
    pub thumbnail_url: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// One entry of [`LpTemplate::sections`].
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TemplateSectionSeed {
    pub section_type: String,
    #[serde(default)]
    pub config: serde_json::Value,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateLpTemplate {
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub sections: Vec<TemplateSectionSeed>,
    pub thumbnail_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateLpTemplate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub sections: Option<Vec<TemplateSectionSeed>>,
    pub thumbnail_url: Option<String>,
    pub is_active: Option<bool>,
}
