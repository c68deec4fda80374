//! Token types for the filter lexer.
//!
//! The lexer uses **registry-backed IDs** for grammar symbols
//! (`Symbol(SymbolId)` from `chasqui_core::symbols`); words and
//! fully-qualified names carry their literal text.
//!
//! ## Notes
//! - A `FullyQualifiedName` token is a word that was re-scanned as a
//!   balanced-parenthesis unit (method argument lists). The parser accepts it
//!   anywhere a `Word` is accepted.

use chasqui_core::symbols::SymbolId;

/// Kind of token produced by the filter lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// A bare word: a property name or a plain clause value.
    Word,
    /// A word extended through one or more balanced `(...)` units.
    FullyQualifiedName,
    /// A grammar symbol with a stable ID.
    Symbol(SymbolId),
    /// End of input.
    Eof,
}

/// A token with its kind, literal text, and character offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub pos: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, pos: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            pos,
        }
    }

    /// Return `true` if this token is the given symbol.
    pub fn is_symbol(&self, id: SymbolId) -> bool {
        self.kind == TokenKind::Symbol(id)
    }

    /// Return `true` for tokens the parser accepts as clause text
    /// (property names and values).
    pub fn is_wordlike(&self) -> bool {
        matches!(self.kind, TokenKind::Word | TokenKind::FullyQualifiedName)
    }

    /// Token text for error messages; the EOF token reads as `end of filter`.
    pub fn display_text(&self) -> String {
        if self.kind == TokenKind::Eof {
            "end of filter".to_string()
        } else {
            self.text.clone()
        }
    }
}
