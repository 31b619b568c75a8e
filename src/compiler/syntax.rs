use std::fmt;

use crate::common::token::{Token, TokenKind};

/// An error raised while scanning characters into tokens: an unexpected
/// character, or a string literal left unterminated at end of file.
#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub line: usize,
    pub message: String,
}

impl LexError {
    pub fn new(line: usize, message: impl Into<String>) -> LexError {
        LexError {
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[line {}] Error: {}", self.line, self.message)
    }
}

impl std::error::Error for LexError {}

/// A fatal error raised while parsing a token stream into an AST. Carries
/// the offending token so the driver can render `at end` / `at '<lexeme>'`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub token: Token,
    pub message: String,
}

impl ParseError {
    pub fn new(token: &Token, message: impl Into<String>) -> ParseError {
        ParseError {
            token: token.clone(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let where_ = if self.token.kind == TokenKind::Eof {
            " at end".to_string()
        } else {
            format!(" at '{}'", self.token.lexeme)
        };
        write!(f, "[line {}] Error{}: {}", self.token.line, where_, self.message)
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn lex_error_has_empty_where() {
        let error = LexError::new(3, "Unexpected character '@'.");
        assert_eq!(error.to_string(), "[line 3] Error: Unexpected character '@'.");
    }

    #[test]
    fn parse_error_at_end() {
        let token = Token::eof(4);
        let error = ParseError::new(&token, "Expect expression.");
        assert_eq!(error.to_string(), "[line 4] Error at end: Expect expression.");
    }

    #[test]
    fn parse_error_at_lexeme() {
        let token = Token::new(TokenKind::Equal, "=", None, 2);
        let error = ParseError::new(&token, "Invalid assignment target.");
        assert_eq!(
            error.to_string(),
            "[line 2] Error at '=': Invalid assignment target."
        );
    }
}
