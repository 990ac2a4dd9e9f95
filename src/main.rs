//! # pos-cli
//!
//! Command-line tool for managing marketplace instances.
//!
//! ## Quick Start
//!
//! ```bash
//! # Store an environment
//! pos-cli env add staging --url https://staging.example.com --email dev@example.com
//!
//! # Remove all data from it (asks you to type 'CLEAN DATA')
//! pos-cli data clean staging
//!
//! # Run the local GraphQL / sync proxy with the GUI on port 3333
//! pos-cli gui serve staging -p 3333
//! ```
//!
//! ## Configuration
//!
//! Environments live in `.marketplace-kit` in the working directory (or the
//! file named by `MARKETPLACE_KIT_PATH`). Without an environment name the
//! `MARKETPLACE_URL`, `MARKETPLACE_TOKEN` and `MARKETPLACE_EMAIL` variables
//! are used.

use anyhow::Result;
use clap::Parser;
use pos_cli::{commands, Cli};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "pos_cli=debug,tower_http=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Main entry point for pos-cli
///
/// Parses command-line arguments and delegates to the appropriate command handler.
/// If no command is provided, displays an error message and exits.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let cmd = cli.cmd.unwrap_or_else(|| {
        eprintln!("No command provided. Use --help to see available commands.");
        std::process::exit(1);
    });
    commands::run(cmd).await
}
