//! hashpipe CLI - copy a stream while hashing it

use clap::Parser;
use hashpipe::config::{CliArgs, PipeConfig};
use hashpipe::error::{HashPipeError, Result};
use hashpipe::runner::{execute, finish, ReportStream};
use std::io;
use tracing_subscriber::EnvFilter;

fn main() {
    // Parse CLI arguments
    let args = CliArgs::parse();

    // Initialize logging; RUST_LOG overrides -v
    let default_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    // Handle result
    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: CliArgs) -> Result<()> {
    // Build configuration
    let config = PipeConfig::from_cli(&args).map_err(HashPipeError::ConfigError)?;

    let outcome = execute(&config)?;

    match config.report_stream() {
        ReportStream::Stderr => finish(&config, &outcome, &mut io::stderr().lock()),
        ReportStream::Stdout => finish(&config, &outcome, &mut io::stdout().lock()),
    }
}
