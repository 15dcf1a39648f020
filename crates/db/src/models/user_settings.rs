//! Per-user settings: role, plan, profile, and the encrypted Gemini key.

use lp_core::types::{DbId, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `user_settings` table.
///
/// The encrypted API key is never serialized; responses expose
/// `has_gemini_api_key` instead.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserSettings {
    pub id: DbId,
    pub user_id: UserId,
    pub role: String,
    pub plan: String,
    pub display_name: Option<String>,
    #[serde(skip_serializing)]
    pub gemini_api_key_encrypted: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl UserSettings {
    pub fn has_gemini_api_key(&self) -> bool {
        self.gemini_api_key_encrypted.is_some()
    }
}

/// DTO for updating the caller's own settings.
///
/// `gemini_api_key`: absent leaves the key untouched, `null` or `""` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserSettings {
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "super::deserialize_some")]
    pub gemini_api_key: Option<Option<String>>,
}
