//! Define the host filter property vocabulary.
//!
//! This module is the single source of truth for the property names a host
//! filter expression may use on the left-hand side of a clause: a stable
//! identifier ([`PropertyKey`]) plus a const metadata table ([`PROPERTIES`])
//! recording canonical spellings, aliases, and the engine filter leaf each
//! property translates to.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**, matching the host grammar.
//! - The registry is intentionally pure (no parsing, no IO); the filter
//!   lexer/parser resolve spellings through it instead of string comparisons.
//!
//! ## Examples
//! ```rust
//! use chasqui_core::props::{self, PropertyKey};
//!
//! assert_eq!(props::from_str("TestCategory"), Some(PropertyKey::TestCategory));
//! assert_eq!(props::from_str("Category"), Some(PropertyKey::TestCategory)); // alias
//! assert_eq!(props::as_str(PropertyKey::Name), "Name");
//! ```

/// Stable identifier for every recognized filter property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    /// A test's full dotted/bracketed identity, including literal argument lists.
    FullyQualifiedName,
    /// A category label attached to a test or fixture.
    TestCategory,
    /// The numeric priority property.
    Priority,
    /// The test's display name.
    Name,
}

/// The engine filter leaf a property translates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeafTag {
    /// `<test>` — full-name match.
    Test,
    /// `<cat>` — category match.
    Cat,
    /// `<name>` — display-name match.
    Name,
    /// `<prop name='…'>` — named property match.
    Prop,
}

/// Metadata for a recognized property.
#[derive(Debug, Clone, Copy)]
pub struct PropertyInfo {
    pub key: PropertyKey,
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
    pub leaf: LeafTag,
}

/// Registry of all recognized filter properties.
pub const PROPERTIES: &[PropertyInfo] = &[
    PropertyInfo {
        key: PropertyKey::FullyQualifiedName,
        canonical: "FullyQualifiedName",
        aliases: &[],
        leaf: LeafTag::Test,
    },
    PropertyInfo {
        key: PropertyKey::TestCategory,
        canonical: "TestCategory",
        aliases: &["Category"],
        leaf: LeafTag::Cat,
    },
    PropertyInfo {
        key: PropertyKey::Priority,
        canonical: "Priority",
        aliases: &[],
        leaf: LeafTag::Prop,
    },
    PropertyInfo {
        key: PropertyKey::Name,
        canonical: "Name",
        aliases: &[],
        leaf: LeafTag::Name,
    },
];

/// Resolve a spelling to a property key, if recognized.
pub fn from_str(spelling: &str) -> Option<PropertyKey> {
    PROPERTIES
        .iter()
        .find(|p| p.canonical == spelling || p.aliases.contains(&spelling))
        .map(|p| p.key)
}

/// Canonical spelling for a property key.
pub fn as_str(key: PropertyKey) -> &'static str {
    info(key).canonical
}

/// Metadata for a property key.
pub fn info(key: PropertyKey) -> &'static PropertyInfo {
    PROPERTIES
        .iter()
        .find(|p| p.key == key)
        .expect("every PropertyKey has a registry entry")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_covers_every_key() {
        for p in PROPERTIES {
            assert_eq!(from_str(p.canonical), Some(p.key));
            for alias in p.aliases {
                assert_eq!(from_str(alias), Some(p.key));
            }
        }
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert_eq!(from_str("testcategory"), None);
        assert_eq!(from_str("FULLYQUALIFIEDNAME"), None);
    }

    #[test]
    fn test_category_alias() {
        assert_eq!(from_str("Category"), Some(PropertyKey::TestCategory));
        assert_eq!(as_str(PropertyKey::TestCategory), "TestCategory");
    }
}
