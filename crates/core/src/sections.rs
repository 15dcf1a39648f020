//! Page section types, section ordering, and page slugs.

use std::collections::HashSet;

use crate::error::CoreError;
use crate::types::DbId;

/// Section types the page editor knows how to render.
pub const SECTION_TYPES: &[&str] = &[
    "hero",
    "features",
    "testimonials",
    "pricing",
    "faq",
    "cta",
    "gallery",
    "footer",
    "custom",
];

/// Page status values (must match `ck_pages_status`).
pub const PAGE_STATUS_DRAFT: &str = "draft";
pub const PAGE_STATUS_PUBLISHED: &str = "published";

/// Maximum slug length in characters.
pub const MAX_SLUG_LEN: usize = 80;

pub fn validate_section_type(section_type: &str) -> Result<(), CoreError> {
    if SECTION_TYPES.contains(&section_type) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unknown section type '{section_type}'. Must be one of: {SECTION_TYPES:?}"
        )))
    }
}

/// Check that `requested` is a permutation of `existing`.
///
/// A reorder request must name every section of the page exactly once.
pub fn validate_reorder(existing: &[DbId], requested: &[DbId]) -> Result<(), CoreError> {
    let mut seen = HashSet::with_capacity(requested.len());
    for id in requested {
        if !seen.insert(*id) {
            return Err(CoreError::Validation(format!(
                "Section {id} appears more than once"
            )));
        }
    }

    let existing_set: HashSet<DbId> = existing.iter().copied().collect();
    if seen != existing_set {
        return Err(CoreError::Validation(
            "Reorder must list every section of the page exactly once".into(),
        ));
    }
    Ok(())
}

/// Derive a URL slug from a page title.
///
/// Lowercases ASCII alphanumerics, collapses every other run of characters
/// into a single `-`, and trims leading/trailing dashes. Returns `"page"` if
/// nothing usable remains (e.g. a title written entirely in Japanese).
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
        if slug.len() >= MAX_SLUG_LEN {
            break;
        }
    }

    slug.truncate(MAX_SLUG_LEN);
    let slug = slug.trim_end_matches('-').to_string();
    if slug.is_empty() {
        "page".to_string()
    } else {
        slug
    }
}

/// Validate a user-supplied slug.
pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    if slug.is_empty() || slug.len() > MAX_SLUG_LEN {
        return Err(CoreError::Validation(format!(
            "Slug must be between 1 and {MAX_SLUG_LEN} characters"
        )));
    }
    let valid_chars = slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if !valid_chars || slug.starts_with('-') || slug.ends_with('-') {
        return Err(CoreError::Validation(
            "Slug may only contain lowercase letters, digits, and inner dashes".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_section_types_pass() {
        assert!(validate_section_type("hero").is_ok());
        assert!(validate_section_type("faq").is_ok());
        assert!(validate_section_type("marquee").is_err());
    }

    #[test]
    fn reorder_accepts_permutation() {
        assert!(validate_reorder(&[1, 2, 3], &[3, 1, 2]).is_ok());
        assert!(validate_reorder(&[], &[]).is_ok());
    }

    #[test]
    fn reorder_rejects_missing_extra_and_duplicate_ids() {
        assert!(validate_reorder(&[1, 2, 3], &[1, 2]).is_err());
        assert!(validate_reorder(&[1, 2], &[1, 2, 9]).is_err());
        assert!(validate_reorder(&[1, 2], &[1, 1]).is_err());
    }

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("Summer Sale 2026!"), "summer-sale-2026");
        assert_eq!(slugify("  --Hello,   World--  "), "hello-world");
    }

    #[test]
    fn slugify_falls_back_for_non_ascii_titles() {
        assert_eq!(slugify("夏のキャンペーン"), "page");
    }

    #[test]
    fn slugify_respects_max_length() {
        let long = "a".repeat(200);
        assert_eq!(slugify(&long).len(), MAX_SLUG_LEN);
    }

    #[test]
    fn validate_slug_rules() {
        assert!(validate_slug("spring-launch").is_ok());
        assert!(validate_slug("Spring").is_err());
        assert!(validate_slug("-edge").is_err());
        assert!(validate_slug("with space").is_err());
        assert!(validate_slug("").is_err());
    }
}
