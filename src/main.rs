use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use loxi::cli::{self, Cli};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = cli.validate().and_then(|()| match &cli.script {
        Some(path) => cli::run_file(path),
        None => cli::run_repl(),
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if matches!(error, cli::CliError::Usage | cli::CliError::Io(_)) {
                eprintln!("{}", error.to_string().red());
            }
            ExitCode::from(error.exit_code() as u8)
        }
    }
}
