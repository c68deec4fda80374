//! Lexer for host filter expressions.
//!
//! Handles tokenization including:
//! - Grammar symbols (`&`, `|`, `!`, parens, `=`, `!=`, `~`, `!~`)
//! - Bare words (property names and clause values)
//! - Fully-qualified-name units: a word immediately followed by `(` is
//!   re-scanned as a balanced-parenthesis unit so method argument lists like
//!   `Method(1,2,"a,b")` survive as one token
//!
//! ## Module Structure
//!
//! - `tokens` - Token types (TokenKind, Token)

pub mod tokens;

pub use tokens::{Token, TokenKind};

use crate::diagnostics::FilterError;
use chasqui_core::symbols::SymbolId;

/// Lexer for a host filter expression.
///
/// Converts the expression into a stream of tokens. Quoted spans inside a
/// balanced unit are opaque: parens and quotes inside a string literal are
/// not structural, and a backslash escapes the next character.
pub struct Lexer<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    current_pos: usize,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given filter expression.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            current_pos: 0,
            tokens: Vec::new(),
        }
    }

    /// Tokenize the entire expression.
    ///
    /// Returns the token stream on success; it always ends with an `Eof`
    /// token. Fails on an unterminated quoted string or an unbalanced
    /// argument list.
    pub fn tokenize(mut self) -> Result<Vec<Token>, FilterError> {
        loop {
            self.skip_whitespace();
            if self.is_at_end() {
                break;
            }
            self.scan_token()?;
        }

        self.tokens
            .push(Token::new(TokenKind::Eof, "", self.current_pos));
        Ok(self.tokens)
    }

    // ========================================================================
    // Core character handling
    // ========================================================================

    fn is_at_end(&mut self) -> bool {
        self.chars.peek().is_none()
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn advance(&mut self) -> Option<char> {
        if let Some((pos, c)) = self.chars.next() {
            self.current_pos = pos + c.len_utf8();
            Some(c)
        } else {
            None
        }
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    // ========================================================================
    // Main scanning dispatch
    // ========================================================================

    fn scan_token(&mut self) -> Result<(), FilterError> {
        let start = self.current_pos;

        let Some(c) = self.advance() else {
            return Ok(());
        };

        match c {
            '&' => self.add_symbol(SymbolId::And, start),
            '|' => self.add_symbol(SymbolId::Or, start),
            '(' => self.add_symbol(SymbolId::LParen, start),
            ')' => self.add_symbol(SymbolId::RParen, start),
            '=' => self.add_symbol(SymbolId::Eq, start),
            '~' => self.add_symbol(SymbolId::Contains, start),
            '!' => {
                if self.match_char('=') {
                    self.add_symbol(SymbolId::NotEq, start);
                } else if self.match_char('~') {
                    self.add_symbol(SymbolId::NotContains, start);
                } else {
                    self.add_symbol(SymbolId::Not, start);
                }
            }
            _ => self.scan_word(start)?,
        }

        Ok(())
    }

    fn add_symbol(&mut self, id: SymbolId, start: usize) {
        self.tokens
            .push(Token::new(TokenKind::Symbol(id), id.spelling(), start));
    }

    // ========================================================================
    // Word and fully-qualified-name scanning
    // ========================================================================

    /// Scan a word starting at `start` (its first character is consumed).
    ///
    /// A word immediately followed by `(` is re-scanned as a balanced unit
    /// and tagged `FullyQualifiedName`; the capture continues through `+`
    /// (nested type) and `.` (further qualification) into more units.
    fn scan_word(&mut self, start: usize) -> Result<(), FilterError> {
        self.consume_word_run();

        let mut kind = TokenKind::Word;
        while self.peek() == Some('(') {
            kind = TokenKind::FullyQualifiedName;
            self.consume_balanced_parens()?;
            // `+` and `.` are word characters, so the run after the argument
            // list also covers nested-type and further qualification.
            self.consume_word_run();
        }

        let text = &self.source[start..self.current_pos];
        self.tokens.push(Token::new(kind, text, start));
        Ok(())
    }

    /// Consume a run of word characters (anything but whitespace and symbols).
    fn consume_word_run(&mut self) {
        while let Some(c) = self.peek() {
            if is_word_char(c) {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Consume a `(...)` unit, tracking nesting depth. Quoted spans are
    /// opaque; parens inside them are not structural.
    fn consume_balanced_parens(&mut self) -> Result<(), FilterError> {
        let open_pos = self.current_pos;
        self.advance(); // consume '('
        let mut depth = 1usize;

        while depth > 0 {
            match self.advance() {
                None => return Err(FilterError::UnbalancedParens { offset: open_pos }),
                Some('(') => depth += 1,
                Some(')') => depth -= 1,
                Some(q @ ('"' | '\'')) => self.consume_quoted(q)?,
                Some(_) => {}
            }
        }

        Ok(())
    }

    /// Consume a quoted span opened by `quote`; backslash escapes the next
    /// character.
    fn consume_quoted(&mut self, quote: char) -> Result<(), FilterError> {
        let open_pos = self.current_pos - quote.len_utf8();
        loop {
            match self.advance() {
                None => return Err(FilterError::UnterminatedQuote { offset: open_pos }),
                Some('\\') => {
                    self.advance();
                }
                Some(c) if c == quote => return Ok(()),
                Some(_) => {}
            }
        }
    }
}

// ============================================================================
// Helper functions
// ============================================================================

/// Check if a character can be part of a word (property name or value).
fn is_word_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '&' | '|' | '!' | '(' | ')' | '=' | '~')
}

/// Convenience function to lex a filter expression.
///
/// This is a shorthand for `Lexer::new(source).tokenize()`.
pub fn lex(source: &str) -> Result<Vec<Token>, FilterError> {
    Lexer::new(source).tokenize()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols() {
        let tokens = lex("& | ! ( ) = != ~ !~").unwrap();
        assert!(tokens[0].is_symbol(SymbolId::And));
        assert!(tokens[1].is_symbol(SymbolId::Or));
        assert!(tokens[2].is_symbol(SymbolId::Not));
        assert!(tokens[3].is_symbol(SymbolId::LParen));
        assert!(tokens[4].is_symbol(SymbolId::RParen));
        assert!(tokens[5].is_symbol(SymbolId::Eq));
        assert!(tokens[6].is_symbol(SymbolId::NotEq));
        assert!(tokens[7].is_symbol(SymbolId::Contains));
        assert!(tokens[8].is_symbol(SymbolId::NotContains));
        assert_eq!(tokens[9].kind, TokenKind::Eof);
    }

    #[test]
    fn test_simple_clause() {
        let tokens = lex("TestCategory=Urgent").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Word);
        assert_eq!(tokens[0].text, "TestCategory");
        assert!(tokens[1].is_symbol(SymbolId::Eq));
        assert_eq!(tokens[2].kind, TokenKind::Word);
        assert_eq!(tokens[2].text, "Urgent");
    }

    #[test]
    fn test_dotted_word() {
        let tokens = lex("My.Namespace.Tests").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Word);
        assert_eq!(tokens[0].text, "My.Namespace.Tests");
    }

    #[test]
    fn test_fully_qualified_name_with_arguments() {
        let tokens = lex(r#"A.B.Method(1,2,"a,b")"#).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::FullyQualifiedName);
        assert_eq!(tokens[0].text, r#"A.B.Method(1,2,"a,b")"#);
        assert_eq!(tokens[1].kind, TokenKind::Eof);
    }

    #[test]
    fn test_fqn_quoted_span_hides_parens() {
        let tokens = lex(r#"M("(((")"#).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::FullyQualifiedName);
        assert_eq!(tokens[0].text, r#"M("(((")"#);
    }

    #[test]
    fn test_fqn_nested_type_continuation() {
        let tokens = lex("Outer.Method(1)+Inner.Method(2)").unwrap();
        assert_eq!(tokens.len(), 2); // one FQN + EOF
        assert_eq!(tokens[0].kind, TokenKind::FullyQualifiedName);
        assert_eq!(tokens[0].text, "Outer.Method(1)+Inner.Method(2)");
    }

    #[test]
    fn test_fqn_further_qualification() {
        let tokens = lex("Fixture(\"x\").TestMethod").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::FullyQualifiedName);
        assert_eq!(tokens[0].text, "Fixture(\"x\").TestMethod");
    }

    #[test]
    fn test_fqn_terminates_at_operator() {
        let tokens = lex("FullyQualifiedName=A.M(42)|TestCategory=Fast").unwrap();
        assert_eq!(tokens[0].text, "FullyQualifiedName");
        assert!(tokens[1].is_symbol(SymbolId::Eq));
        assert_eq!(tokens[2].kind, TokenKind::FullyQualifiedName);
        assert_eq!(tokens[2].text, "A.M(42)");
        assert!(tokens[3].is_symbol(SymbolId::Or));
        assert_eq!(tokens[4].text, "TestCategory");
    }

    #[test]
    fn test_generic_backtick_names() {
        let tokens = lex("Container`1[System.String].Check").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Word);
        assert_eq!(tokens[0].text, "Container`1[System.String].Check");
    }

    #[test]
    fn test_unbalanced_argument_list() {
        let err = lex("Method(1,2").unwrap_err();
        assert!(matches!(err, FilterError::UnbalancedParens { offset: 6 }));
    }

    #[test]
    fn test_unterminated_quote() {
        let err = lex(r#"Method("abc)"#).unwrap_err();
        assert!(matches!(err, FilterError::UnterminatedQuote { .. }));
    }

    #[test]
    fn test_token_positions() {
        let tokens = lex("a & b").unwrap();
        assert_eq!(tokens[0].pos, 0);
        assert_eq!(tokens[1].pos, 2);
        assert_eq!(tokens[2].pos, 4);
    }

    #[test]
    fn test_empty_input_is_just_eof() {
        let tokens = lex("   ").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eof);
    }
}
