//! Recipe list filtering and pagination helpers.

use crate::types::CATEGORY_ALL;

// ---------------------------------------------------------------------------
// Pagination defaults
// ---------------------------------------------------------------------------

/// Default number of recipes per list page.
pub const DEFAULT_LIST_LIMIT: i64 = 100;

/// Maximum number of recipes per list page.
pub const MAX_LIST_LIMIT: i64 = 500;

/// Clamp a user-provided limit to valid bounds.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Escape `%`, `_` and `\` so user input matches literally inside an
/// `ILIKE ... ESCAPE '\'` pattern.
pub fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// `%term%` pattern for a free-text search, or `None` for blank input.
pub fn contains_pattern(search: Option<&str>) -> Option<String> {
    let term = search?.trim();
    if term.is_empty() {
        None
    } else {
        Some(format!("%{}%", escape_like(term)))
    }
}

/// Category filter value, with blank and `"All"` meaning no filter.
pub fn category_filter(category: Option<&str>) -> Option<&str> {
    category
        .map(str::trim)
        .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case(CATEGORY_ALL))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
