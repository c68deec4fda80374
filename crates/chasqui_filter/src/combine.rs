//! Combine two resolved filter documents.
//!
//! In the engine dialect, multiple direct children of `<filter>` are ANDed,
//! so combining is unwrapping both operands and juxtaposing their fragments
//! inside one wrapper. Both operands are already fully resolved trees, so
//! there is no precedence ambiguity.

use crate::emit::EMPTY_FILTER;

/// Combine two filter documents into one (logical AND by juxtaposition).
///
/// The empty filter is the identity element; combining two empty filters
/// yields the empty filter.
pub fn combine(first: &str, second: &str) -> String {
    let a = unwrap_filter(first);
    let b = unwrap_filter(second);
    if a.is_empty() && b.is_empty() {
        EMPTY_FILTER.to_string()
    } else {
        format!("<filter>{}{}</filter>", a, b)
    }
}

/// Strip the outer `<filter>` wrapper from a document, yielding its fragment.
fn unwrap_filter(document: &str) -> &str {
    let trimmed = document.trim();
    if trimmed.is_empty() || trimmed == "<filter/>" || trimmed == "<filter />" {
        return "";
    }
    trimmed
        .strip_prefix("<filter>")
        .and_then(|rest| rest.strip_suffix("</filter>"))
        .unwrap_or(trimmed)
}
