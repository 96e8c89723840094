//! ID normalization and slug utilities.
//!
//! Provides functions for turning free-form labels and titles into stable,
//! URL-friendly identifiers. Used for tag/category matching and for deriving
//! a document slug from its title.

/// Normalize an identifier to lowercase kebab-case.
///
/// Performs the following transformations:
/// 1. Trims leading/trailing whitespace
/// 2. Converts to lowercase
/// 3. Replaces underscores with hyphens
/// 4. Collapses multiple whitespace into single hyphens
///
/// # Examples
///
/// ```
/// use folio_core::util::ids::normalize_id;
///
/// assert_eq!(normalize_id("Stream Analytics"), "stream-analytics");
/// assert_eq!(normalize_id("template_parameters"), "template-parameters");
/// assert_eq!(normalize_id("  Mixed   Case  "), "mixed-case");
/// ```
pub fn normalize_id(id: &str) -> String {
    id.trim()
        .to_lowercase()
        .replace('_', " ")
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join("-")
}

/// Derive a URL slug from a title.
///
/// Every run of characters that is not alphanumeric becomes a single hyphen;
/// leading and trailing hyphens are dropped. Non-ASCII letters are kept.
///
/// # Examples
///
/// ```
/// use folio_core::util::ids::slugify;
///
/// assert_eq!(slugify("Windowing in Azure Stream Analytics"), "windowing-in-azure-stream-analytics");
/// assert_eq!(slugify("C++20: Template Parameters"), "c-20-template-parameters");
/// assert_eq!(slugify("  --  "), "");
/// ```
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_separator = false;

    for ch in title.chars() {
        if ch.is_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.extend(ch.to_lowercase());
        } else {
            pending_separator = true;
        }
    }

    slug
}
