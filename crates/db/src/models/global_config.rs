use lp_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `global_configs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GlobalConfig {
    pub id: DbId,
    pub key: String,
    pub value: serde_json::Value,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for setting a config value.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertGlobalConfig {
    pub value: serde_json::Value,
    pub description: Option<String>,
}
