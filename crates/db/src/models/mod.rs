//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches; nullable
//!   columns use `Option<Option<T>>` so `null` clears them

use serde::{Deserialize, Deserializer};

pub mod banner;
pub mod credit;
pub mod global_config;
pub mod inquiry;
pub mod media;
pub mod page;
pub mod subscription;
pub mod template;
pub mod thumbnail;
pub mod user_settings;

/// Deserialize a present field as `Some`, so that with `#[serde(default)]`
/// an absent field stays `None` while an explicit `null` becomes `Some(None)`.
///
/// Used by update DTOs whose nullable columns can be cleared.
pub(crate) fn deserialize_some<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
