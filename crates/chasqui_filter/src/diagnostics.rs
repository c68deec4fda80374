//! Diagnostics for host filter expressions.
//!
//! Filter strings are short and come from a host dialog or command line, so
//! errors report the offending token text and its character offset rather
//! than line/column pairs.

use miette::Diagnostic;
use thiserror::Error;

/// A syntax error in a host filter expression.
///
/// ## Notes
/// - Failure of the fast-path recognizer is *not* one of these: an
///   unrecognized shape there just falls back to the general parser.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum FilterError {
    #[error("filter expression is empty")]
    #[diagnostic(code(chasqui::filter::empty))]
    Empty,

    #[error("unexpected token `{token}` at offset {offset}")]
    #[diagnostic(code(chasqui::filter::unexpected_token))]
    UnexpectedToken { token: String, offset: usize },

    #[error("expected {expected}, found `{token}` at offset {offset}")]
    #[diagnostic(code(chasqui::filter::expected))]
    Expected {
        expected: &'static str,
        token: String,
        offset: usize,
    },

    #[error("unbalanced parentheses starting at offset {offset}")]
    #[diagnostic(
        code(chasqui::filter::unbalanced_parens),
        help("parentheses inside a method argument list must be balanced or quoted")
    )]
    UnbalancedParens { offset: usize },

    #[error("unterminated quoted string starting at offset {offset}")]
    #[diagnostic(code(chasqui::filter::unterminated_quote))]
    UnterminatedQuote { offset: usize },
}

impl FilterError {
    /// Character offset of the error in the original filter string.
    pub fn offset(&self) -> usize {
        match self {
            FilterError::Empty => 0,
            FilterError::UnexpectedToken { offset, .. }
            | FilterError::Expected { offset, .. }
            | FilterError::UnbalancedParens { offset }
            | FilterError::UnterminatedQuote { offset } => *offset,
        }
    }
}
