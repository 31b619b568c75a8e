//! # Loxi
//! This crate contains the core of a tree-walking interpreter for Lox, a
//! small dynamically-typed scripting language: numbers, strings, booleans,
//! nil, globals, lexical scope, conditionals, loops, first-class
//! user-defined functions with real closures, and one built-in `clock`
//! primitive.
//!
//! ## Overview of the interpretation pipeline
//! Source code is represented as a [`Source`](common::source::Source): an
//! owned string of contents paired with wherever it came from (a file path,
//! or a synthetic name for REPL input).
//!
//! The first phase is lexing. The [`Lexer`](compiler::lex::Lexer) reads
//! through a `Source` and produces a stream of [`Token`](common::token::Token)s.
//! To lex a source, use [`compiler::lex::lex`].
//!
//! The next phase is parsing. The [`Parser`](compiler::parse::Parser) takes
//! a token stream and builds an Abstract Syntax Tree (AST) of
//! [`Stmt`](common::ast::Stmt)s over [`Expr`](common::ast::Expr)s, using
//! recursive descent over a layered precedence grammar. To parse a token
//! stream, use [`compiler::parse::parse`].
//!
//! The final phase is tree-walking evaluation. The
//! [`Interpreter`](interpreter::interp::Interpreter) walks the statement
//! list directly, without any intermediate bytecode, dispatching on each
//! node's variant and threading a lexically-nested
//! [`Environment`](interpreter::environment::Environment) chain.
//!
//! ```
//! use loxi::common::source::Source;
//! use loxi::compiler::{lex, parse};
//! use loxi::interpreter::interp::Interpreter;
//!
//! let source = Source::source("print 1 + 2 * 3;");
//! let (tokens, errors) = lex::lex(&source);
//! assert!(errors.is_empty());
//! let program = parse::parse(tokens).unwrap();
//!
//! let mut out = Vec::new();
//! let mut interpreter = Interpreter::new(&mut out);
//! interpreter.interpret(&program).unwrap();
//! assert_eq!(out, b"7\n");
//! ```

pub mod common;
pub mod compiler;
pub mod interpreter;
pub mod cli;

pub use common::source::Source;
pub use compiler::syntax::{LexError, ParseError};
pub use interpreter::error::RuntimeError;
