//! Well-known role name constants.
//!
//! These must match the `ck_user_settings_role` check constraint.

use crate::error::CoreError;

pub const ROLE_USER: &str = "user";
pub const ROLE_ADMIN: &str = "admin";

const VALID_ROLES: &[&str] = &[ROLE_USER, ROLE_ADMIN];

/// Validate that `role` is a known role name.
pub fn validate_role(role: &str) -> Result<(), CoreError> {
    if VALID_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid role '{role}'. Must be one of: {VALID_ROLES:?}"
        )))
    }
}
