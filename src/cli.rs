//! The command-line shell around the interpreter core. Trivial by design:
//! it only turns argv and a file (or stdin) into a [`Source`], runs it
//! through the pipeline, and turns the outcome into a process exit code.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser as ClapParser;
use colored::Colorize;
use thiserror::Error;

use crate::common::source::Source;
use crate::compiler::syntax::{LexError, ParseError};
use crate::compiler::{lex, parse};
use crate::interpreter::error::RuntimeError;
use crate::interpreter::interp::Interpreter;

pub const USAGE: &str = "Usage: loxi [script]";

/// `loxi [script]` — zero args starts a REPL, one arg interprets a file.
/// `script` and `extra` are split so a second positional argument can be
/// detected and rejected with the exact usage message §6 specifies,
/// rather than clap's generic "unexpected argument" diagnostic.
#[derive(Debug, ClapParser)]
#[command(name = "loxi", about = "A tree-walking interpreter for Lox", override_usage = "loxi [script]")]
pub struct Cli {
    /// Path to a Lox source file. Omit to start an interactive prompt.
    pub script: Option<PathBuf>,

    #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
    pub extra: Vec<String>,
}

/// Every way running the CLI can fail, each carrying the exit code §6
/// prescribes for it.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{USAGE}")]
    Usage,

    #[error("Error: file could not be read: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Lex(LexErrors),

    #[error("{0}")]
    Parse(#[from] ParseError),

    #[error("{0}")]
    Runtime(#[from] RuntimeError),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage => 64,
            CliError::Io(_) => 64,
            CliError::Lex(_) => 65,
            CliError::Parse(_) => 63,
            CliError::Runtime(_) => 70,
        }
    }
}

/// A non-empty batch of lex errors, rendered one per line. Wrapped in its
/// own type (rather than a bare `Vec<LexError>`) so it can carry its own
/// `Display` impl for `CliError`'s `#[error("{0}")]`.
#[derive(Debug, Clone)]
pub struct LexErrors(pub Vec<LexError>);

impl std::fmt::Display for LexErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl Cli {
    pub fn validate(&self) -> Result<(), CliError> {
        if !self.extra.is_empty() {
            return Err(CliError::Usage);
        }
        Ok(())
    }
}

/// Runs a whole source string against a fresh interpreter, writing `print`
/// output to `out`. Shared by both `run_file` and each REPL line's
/// lex/parse stage (the REPL keeps its own `Interpreter` across lines so
/// declarations accumulate).
pub fn run_source(source: &Source, out: &mut dyn Write) -> Result<(), CliError> {
    let mut interpreter = Interpreter::new(out);
    run_source_with(source, &mut interpreter)
}

fn run_source_with(source: &Source, interpreter: &mut Interpreter<'_>) -> Result<(), CliError> {
    let (tokens, lex_errors) = lex::lex(source);
    if !lex_errors.is_empty() {
        for error in &lex_errors {
            eprintln!("{}", error.to_string().red());
        }
        return Err(CliError::Lex(LexErrors(lex_errors)));
    }

    let program = parse::parse(tokens).map_err(|error| {
        eprintln!("{}", error.to_string().red());
        CliError::Parse(error)
    })?;

    interpreter.interpret(&program).map_err(|error| {
        eprintln!("{}", error.to_string().red());
        CliError::Runtime(error)
    })
}

pub fn run_file(path: &PathBuf) -> Result<(), CliError> {
    let source = Source::path(path)?;
    tracing::info!(path = %path.display(), "running script");
    run_source(&source, &mut io::stdout())
}

/// A minimal REPL: each line is lexed, parsed, and interpreted as its own
/// program against one persistent interpreter, so top-level `var`/`fun`
/// declarations accumulate across lines. Errors on one line are reported
/// and the prompt continues; EOF exits cleanly.
pub fn run_repl() -> Result<(), CliError> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut interpreter = Interpreter::new(&mut stdout);

    print!("> ");
    io::stdout().flush().ok();

    for line in stdin.lock().lines() {
        let line = line?;
        let source = Source::source(&line);
        if let Err(error) = run_source_with(&source, &mut interpreter) {
            tracing::debug!(%error, "repl line failed");
        }
        print!("> ");
        io::stdout().flush().ok();
    }

    println!();
    Ok(())
}
