//! # pos-cli library
//!
//! Core library functionality for the pos-cli tool: environment resolution,
//! the marketplace gateway client, the confirmation-gated data clean flow,
//! and the local proxy server.

use clap::Parser;

pub mod clean;
pub mod commands;
pub mod config;
pub mod constants;
pub mod gateway;
pub mod prompt;
pub mod server;

/// CLI tool for managing marketplace instances
///
/// Cleans instance data behind an explicit confirmation and runs a local
/// proxy that forwards GraphQL and sync requests to an instance while
/// serving the Resources Editor and GraphQL Browser.
#[derive(Parser)]
#[command(
    name = "pos-cli",
    version,
    about = "CLI tool for managing marketplace instances",
    long_about = "Command-line tool for managing marketplace instances.\n\nCleans instance data behind an explicit confirmation and runs a local proxy\nthat forwards GraphQL and sync requests while serving the GUI tools."
)]
pub struct Cli {
    /// Print debug logs (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub cmd: Option<commands::Commands>,
}
