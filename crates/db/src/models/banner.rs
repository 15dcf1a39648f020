//! Marketing banners edited on a fixed-size canvas.

use lp_core::types::{DbId, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `banners` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Banner {
    pub id: DbId,
    pub user_id: UserId,
    pub name: String,
    pub width: i32,
    pub height: i32,
    pub image_url: Option<String>,
    pub masks: serde_json::Value,
    pub metadata: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateBanner {
    pub name: String,
    pub width: i32,
    pub height: i32,
    pub image_url: Option<String>,
    pub masks: Option<serde_json::Value>,
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBanner {
    pub name: Option<String>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    #[serde(default, deserialize_with = "super::deserialize_some")]
    pub image_url: Option<Option<String>>,
    pub masks: Option<serde_json::Value>,
    pub metadata: Option<serde_json::Value>,
}
