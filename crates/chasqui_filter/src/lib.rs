//! Host filter frontend for the chasqui test bridge: lexer, parser, filter
//! tree, engine-XML emission, the fully-qualified-name fast path, and the
//! filter combiner.
//!
//! This crate is dependency-light and intended for reuse by the adapter and by
//! tooling that needs to translate host filter expressions offline.
//!
//! ## Notes
//! - This crate is intentionally "filter-only": it knows nothing about
//!   assemblies, engines, or test results.
//! - Property and symbol vocabulary comes from the `chasqui_core` registries.
//!
//! ## Examples
//! ```rust
//! let xml = chasqui_filter::translate("TestCategory=Urgent|TestCategory=High").unwrap();
//! assert_eq!(xml, "<filter><or><cat>Urgent</cat><cat>High</cat></or></filter>");
//! ```

pub mod ast;
pub mod combine;
pub mod diagnostics;
pub mod emit;
pub mod fastpath;
pub mod lexer;
pub mod parser;

pub use ast::FilterNode;
pub use diagnostics::FilterError;
pub use emit::EMPTY_FILTER;

/// Translate a host filter expression into an engine filter document.
///
/// This is the general path: the fast path in [`fastpath`] should be consulted
/// first for pure name-selection filters.
///
/// ## Errors
/// Returns a [`FilterError`] carrying the offending token and its character
/// offset when the expression is malformed. An invalid filter must stop the
/// run attempt for its assembly; it is never silently recovered.
#[tracing::instrument(skip_all, fields(filter_len = filter.len()))]
pub fn translate(filter: &str) -> Result<String, FilterError> {
    let node = parse(filter)?;
    Ok(emit::to_filter_xml(&node))
}

/// Parse a host filter expression into a [`FilterNode`] tree.
pub fn parse(filter: &str) -> Result<FilterNode, FilterError> {
    let tokens = lexer::lex(filter)?;
    parser::parse(&tokens)
}
