//! Contact inquiry statuses and input validation.

use crate::error::CoreError;

pub const STATUS_NEW: &str = "new";
pub const STATUS_IN_PROGRESS: &str = "in_progress";
pub const STATUS_RESOLVED: &str = "resolved";

const VALID_STATUSES: &[&str] = &[STATUS_NEW, STATUS_IN_PROGRESS, STATUS_RESOLVED];

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_MESSAGE_LEN: usize = 5000;

pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid inquiry status '{status}'. Must be one of: {VALID_STATUSES:?}"
        )))
    }
}

/// Validate the public contact form fields.
pub fn validate_submission(name: &str, email: &str, message: &str) -> Result<(), CoreError> {
    let name = name.trim();
    if name.is_empty() || name.chars().count() > MAX_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Name must be between 1 and {MAX_NAME_LEN} characters"
        )));
    }
    if !looks_like_email(email.trim()) {
        return Err(CoreError::Validation("Email address is invalid".into()));
    }
    let message = message.trim();
    if message.is_empty() || message.chars().count() > MAX_MESSAGE_LEN {
        return Err(CoreError::Validation(format!(
            "Message must be between 1 and {MAX_MESSAGE_LEN} characters"
        )));
    }
    Ok(())
}

/// Shallow syntactic check: one `@`, non-empty local part, dotted domain.
fn looks_like_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.contains(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses() {
        assert!(validate_status("new").is_ok());
        assert!(validate_status("resolved").is_ok());
        assert!(validate_status("closed").is_err());
    }

    #[test]
    fn valid_submission_passes() {
        assert!(
            validate_submission("Taro", "taro@example.jp", "Hello").is_ok()
        );
    }

    #[test]
    fn invalid_submissions_fail() {
        assert!(validate_submission("", "a@b.co", "hi").is_err());
        assert!(validate_submission("A", "not-an-email", "hi").is_err());
        assert!(validate_submission("A", "a@b", "hi").is_err());
        assert!(validate_submission("A", "a@@b.co", "hi").is_err());
        assert!(validate_submission("A", "a@b.co", "   ").is_err());
        assert!(
            validate_submission("A", "a@b.co", &"x".repeat(MAX_MESSAGE_LEN + 1)).is_err()
        );
    }
}
