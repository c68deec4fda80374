//! Define the symbol vocabulary for the host filter grammar.
//!
//! Symbols cover both the boolean connectives (`&`, `|`, `!`, parentheses)
//! and the relational operators (`=`, `!=`, `~`, `!~`).
//!
//! ## Notes
//! - This module is vocabulary only (spellings + grouping). The filter lexer
//!   owns the actual tokenization, including the two-character lookahead for
//!   `!=` and `!~`.

/// Stable identifier for filter grammar symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolId {
    // Boolean connectives
    And,
    Or,
    Not,
    LParen,
    RParen,

    // Relational operators
    Eq,
    NotEq,
    Contains,
    NotContains,
}

impl SymbolId {
    /// Canonical spelling, as written in a host filter expression.
    pub fn spelling(self) -> &'static str {
        match self {
            SymbolId::And => "&",
            SymbolId::Or => "|",
            SymbolId::Not => "!",
            SymbolId::LParen => "(",
            SymbolId::RParen => ")",
            SymbolId::Eq => "=",
            SymbolId::NotEq => "!=",
            SymbolId::Contains => "~",
            SymbolId::NotContains => "!~",
        }
    }

    /// Return `true` for the four relational operators.
    pub fn is_relational(self) -> bool {
        matches!(
            self,
            SymbolId::Eq | SymbolId::NotEq | SymbolId::Contains | SymbolId::NotContains
        )
    }

    /// Return `true` for the operators that negate their clause (`!=`, `!~`).
    pub fn is_negated(self) -> bool {
        matches!(self, SymbolId::NotEq | SymbolId::NotContains)
    }

    /// Return `true` for the contains-operators, which translate to regex leaves.
    pub fn is_contains(self) -> bool {
        matches!(self, SymbolId::Contains | SymbolId::NotContains)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relational_grouping() {
        assert!(SymbolId::Eq.is_relational());
        assert!(SymbolId::NotContains.is_relational());
        assert!(!SymbolId::And.is_relational());
        assert!(!SymbolId::LParen.is_relational());
    }

    #[test]
    fn test_negation_and_contains_flags() {
        assert!(SymbolId::NotEq.is_negated());
        assert!(SymbolId::NotContains.is_negated());
        assert!(!SymbolId::Eq.is_negated());
        assert!(SymbolId::Contains.is_contains());
        assert!(SymbolId::NotContains.is_contains());
        assert!(!SymbolId::NotEq.is_contains());
    }
}
