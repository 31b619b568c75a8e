use std::fmt;

use crate::common::token::Token;

/// Distinguishes the one runtime error sub-kind the spec calls out from
/// everything else; used so callers (and tests) can match on it without
/// parsing the message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeErrorKind {
    General,
    DivisionByZero,
}

/// A runtime error: a kind, the token it occurred at (for line/lexeme
/// reporting), and a human-readable message.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeError {
    pub kind: RuntimeErrorKind,
    pub token: Token,
    pub message: String,
}

impl RuntimeError {
    pub fn new(token: &Token, message: impl Into<String>) -> RuntimeError {
        RuntimeError {
            kind: RuntimeErrorKind::General,
            token: token.clone(),
            message: message.into(),
        }
    }

    pub fn division_by_zero(token: &Token) -> RuntimeError {
        RuntimeError {
            kind: RuntimeErrorKind::DivisionByZero,
            token: token.clone(),
            message: "Cannot divide by zero".to_string(),
        }
    }

    pub fn undefined_variable(name: &Token) -> RuntimeError {
        RuntimeError::new(name, format!("Undefined variable '{}'.", name.lexeme))
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Error at: {} on line {}: {}",
            self.token.lexeme, self.token.line, self.message
        )
    }
}

impl std::error::Error for RuntimeError {}
