//! Fast path for pure name-selection filters.
//!
//! Hosts commonly emit `(FullyQualifiedName=A|FullyQualifiedName=B|...)` for
//! "run these N selected tests", often with thousands of clauses and heavy
//! backslash-escaping of characters that are meaningful to the general
//! grammar (parens, quotes, backslashes in generic type names). Recognizing
//! that shape directly is both faster and more robust than running the full
//! parser over it.
//!
//! Two operations live here:
//! - [`is_fully_qualified_name_filter`] — the strict checker: the whole
//!   string must be a pure disjunction of `FullyQualifiedName=` clauses.
//! - [`fully_qualified_names`] — the lenient extractor: pulls the literal
//!   names out, skipping clauses that are not `FullyQualifiedName=` equalities.
//!
//! Failing to recognize a filter here is not an error; it is the signal to
//! fall back to the general parser.
//!
//! "Escaped" throughout means preceded by an odd number of contiguous
//! backslashes.

use std::sync::LazyLock;

use regex::Regex;

/// Foreign clause properties at a clause boundary disqualify the strict
/// checker outright.
static FOREIGN_PROPERTY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[|&(])\s*(?:TestCategory|Category|Priority|Name)\s*!?[=~]")
        .expect("foreign property pattern")
});

/// Check whether the filter string is purely a disjunction of
/// `FullyQualifiedName=` equality clauses.
pub fn is_fully_qualified_name_filter(filter: &str) -> bool {
    let stripped = strip_outer_parens(filter);
    if stripped.is_empty() {
        return false;
    }
    if FOREIGN_PROPERTY.is_match(stripped) {
        return false;
    }
    let Some(clauses) = split_disjunction(stripped) else {
        // An unescaped '&' anywhere is a hard rejection: the fast path only
        // handles pure disjunction.
        return false;
    };
    clauses
        .iter()
        .all(|clause| fqn_clause_value(clause).is_some_and(|v| !v.trim().is_empty()))
}

/// Extract the literal full names from a name-selection filter.
///
/// Clauses that are not `FullyQualifiedName=` equalities are skipped, not an
/// error. Values are trimmed, backslash-unescaped, and empty values dropped.
/// A trailing `|` or an unescaped `&` invalidates the whole string and
/// returns an empty list.
pub fn fully_qualified_names(filter: &str) -> Vec<String> {
    let stripped = strip_outer_parens(filter);
    let Some(clauses) = split_disjunction(stripped) else {
        return Vec::new();
    };
    if clauses.iter().any(|clause| clause.trim().is_empty()) {
        return Vec::new();
    }
    clauses
        .iter()
        .filter_map(|clause| fqn_clause_value(clause))
        .map(|value| unescape(value.trim()))
        .filter(|value| !value.is_empty())
        .collect()
}

/// Strip matching outer parentheses, one layer at a time, as long as the
/// outer pair spans the whole (trimmed) string.
fn strip_outer_parens(filter: &str) -> &str {
    let mut s = filter.trim();
    loop {
        if !s.starts_with('(') {
            return s;
        }

        let mut depth = 0usize;
        let mut escaped = false;
        let mut close = None;
        for (i, c) in s.char_indices() {
            if escaped {
                escaped = false;
                continue;
            }
            match c {
                '\\' => escaped = true,
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        close = Some(i);
                        break;
                    }
                }
                _ => {}
            }
        }

        match close {
            Some(i) if i == s.len() - 1 => s = s[1..i].trim(),
            _ => return s,
        }
    }
}

/// Split on unescaped `|`. Returns `None` if an unescaped `&` is found.
fn split_disjunction(s: &str) -> Option<Vec<&str>> {
    let mut clauses = Vec::new();
    let mut start = 0usize;
    let mut escaped = false;
    for (i, c) in s.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '|' => {
                clauses.push(&s[start..i]);
                start = i + 1;
            }
            '&' => return None,
            _ => {}
        }
    }
    clauses.push(&s[start..]);
    Some(clauses)
}

/// Match `FullyQualifiedName = value` and return the raw value text.
fn fqn_clause_value(clause: &str) -> Option<&str> {
    let rest = clause.trim_start().strip_prefix("FullyQualifiedName")?;
    rest.trim_start().strip_prefix('=')
}

/// Remove backslash escapes: `\c` becomes `c` for any character.
fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

// ============================================================================
// TESTS
// ============================================================================
