//! Recursive-descent parser for host filter expressions.
//!
//! Grammar, lowest to highest precedence:
//!
//! ```text
//! Expression := Term ('|' Term)*
//! Term       := Condition ('&' Condition)*
//! Condition  := '(' Expression ')'
//!             | '!' '(' Expression ')'
//!             | Word RelOp Value
//!             | Word                      # implicit contains on full name
//! ```
//!
//! `Word` on the left of a `RelOp` resolves through the property registry;
//! an unrecognized property name emits a `<prop name='…'>` leaf, since the
//! host grammar admits arbitrary property names.

use chasqui_core::props::{self, PropertyKey};
use chasqui_core::symbols::SymbolId;

use crate::ast::FilterNode;
use crate::diagnostics::FilterError;
use crate::emit::regex_escape;
use crate::lexer::{Token, TokenKind};

/// Parse a token stream into a filter tree.
///
/// ## Errors
/// Fails with a [`FilterError`] on empty input, an unexpected token, or
/// trailing input after a complete expression.
pub fn parse(tokens: &[Token]) -> Result<FilterNode, FilterError> {
    Parser::new(tokens).parse()
}

/// Parser state: a token slice and a cursor with one-token lookahead.
struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn parse(mut self) -> Result<FilterNode, FilterError> {
        if self.is_at_end() {
            return Err(FilterError::Empty);
        }

        let node = self.expression()?;

        if !self.is_at_end() {
            let t = self.peek();
            return Err(FilterError::UnexpectedToken {
                token: t.display_text(),
                offset: t.pos,
            });
        }

        Ok(node)
    }

    // ========================================================================
    // Grammar productions
    // ========================================================================

    fn expression(&mut self) -> Result<FilterNode, FilterError> {
        let mut terms = vec![self.term()?];
        while self.match_symbol(SymbolId::Or) {
            terms.push(self.term()?);
        }
        Ok(collapse(terms, FilterNode::Or))
    }

    fn term(&mut self) -> Result<FilterNode, FilterError> {
        let mut conditions = vec![self.condition()?];
        while self.match_symbol(SymbolId::And) {
            conditions.push(self.condition()?);
        }
        Ok(collapse(conditions, FilterNode::And))
    }

    fn condition(&mut self) -> Result<FilterNode, FilterError> {
        if self.match_symbol(SymbolId::LParen) {
            let inner = self.expression()?;
            self.expect_symbol(SymbolId::RParen, "`)`")?;
            return Ok(inner);
        }

        if self.match_symbol(SymbolId::Not) {
            self.expect_symbol(SymbolId::LParen, "`(` after `!`")?;
            let inner = self.expression()?;
            self.expect_symbol(SymbolId::RParen, "`)`")?;
            return Ok(FilterNode::Not(Box::new(inner)));
        }

        if self.peek().is_wordlike() {
            let lhs = self.advance().clone();

            if let Some(op) = self.match_relational() {
                let value = self.expect_wordlike("a value after the operator")?;
                return Ok(build_clause(&lhs.text, op, &value.text));
            }

            // A bare word is an implicit contains-match against the full name.
            return Ok(FilterNode::FullName {
                value: regex_escape(&lhs.text),
                regex: true,
            });
        }

        let t = self.peek();
        Err(FilterError::UnexpectedToken {
            token: t.display_text(),
            offset: t.pos,
        })
    }

    // ========================================================================
    // Token-stream helpers
    // ========================================================================

    fn is_at_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.pos += 1;
        }
        &self.tokens[self.pos - 1]
    }

    fn match_symbol(&mut self, id: SymbolId) -> bool {
        if self.peek().is_symbol(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume and return a relational operator if one is next.
    fn match_relational(&mut self) -> Option<SymbolId> {
        if let TokenKind::Symbol(id) = self.peek().kind {
            if id.is_relational() {
                self.advance();
                return Some(id);
            }
        }
        None
    }

    fn expect_symbol(&mut self, id: SymbolId, expected: &'static str) -> Result<(), FilterError> {
        if self.match_symbol(id) {
            Ok(())
        } else {
            let t = self.peek();
            Err(FilterError::Expected {
                expected,
                token: t.display_text(),
                offset: t.pos,
            })
        }
    }

    fn expect_wordlike(&mut self, expected: &'static str) -> Result<Token, FilterError> {
        if self.peek().is_wordlike() {
            Ok(self.advance().clone())
        } else {
            let t = self.peek();
            Err(FilterError::Expected {
                expected,
                token: t.display_text(),
                offset: t.pos,
            })
        }
    }
}

/// Collapse a production's children: one child stays bare, several wrap.
fn collapse(mut nodes: Vec<FilterNode>, wrap: fn(Vec<FilterNode>) -> FilterNode) -> FilterNode {
    if nodes.len() == 1 {
        nodes.pop().expect("len checked above")
    } else {
        wrap(nodes)
    }
}

/// Build the leaf (possibly negated) for `property op value`.
fn build_clause(property: &str, op: SymbolId, value: &str) -> FilterNode {
    let leaf_value = if op.is_contains() {
        regex_escape(value)
    } else {
        value.to_string()
    };
    let regex = op.is_contains();

    let leaf = match props::from_str(property) {
        Some(PropertyKey::FullyQualifiedName) => FilterNode::FullName {
            value: leaf_value,
            regex,
        },
        Some(PropertyKey::TestCategory) => FilterNode::Category {
            value: leaf_value,
            regex,
        },
        Some(PropertyKey::Name) => FilterNode::Name {
            value: leaf_value,
            regex,
        },
        Some(PropertyKey::Priority) => FilterNode::Property {
            name: props::as_str(PropertyKey::Priority).to_string(),
            value: leaf_value,
            regex,
        },
        None => FilterNode::Property {
            name: property.to_string(),
            value: leaf_value,
            regex,
        },
    };

    if op.is_negated() {
        FilterNode::Not(Box::new(leaf))
    } else {
        leaf
    }
}

// ============================================================================
// TESTS
// ============================================================================
