//! Validation shared by banner and thumbnail handlers.

use lp_core::error::CoreError;

/// Largest accepted canvas edge in pixels.
pub const MAX_CANVAS_EDGE: i32 = 8192;

/// Check a creative's name and any provided dimensions.
pub fn validate_canvas(
    name: &str,
    width: Option<i32>,
    height: Option<i32>,
) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation("Name must not be empty".into()));
    }
    for (label, value) in [("width", width), ("height", height)] {
        if let Some(v) = value {
            if !(1..=MAX_CANVAS_EDGE).contains(&v) {
                return Err(CoreError::Validation(format!(
                    "{label} must be between 1 and {MAX_CANVAS_EDGE} pixels"
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_bounds() {
        assert!(validate_canvas("Hero", Some(1200), Some(628)).is_ok());
        assert!(validate_canvas("Hero", None, None).is_ok());
        assert!(validate_canvas("  ", Some(10), Some(10)).is_err());
        assert!(validate_canvas("Hero", Some(0), Some(10)).is_err());
        assert!(
            validate_canvas("Hero", Some(10), Some(MAX_CANVAS_EDGE + 1)).is_err()
        );
    }
}
