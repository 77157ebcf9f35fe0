//! CLI module for rungate
//!
//! Provides the command-line interface for:
//! - serve: boot the gate server
//! - admin: the offline provisioning surface (create administrators,
//!   reset passwords, remove, list) - not reachable from the chat or
//!   gate surfaces

mod args;
mod commands;
pub mod errors;
mod io;

pub use args::{AdminCommand, Cli, Command};
pub use commands::run_command;
pub use errors::{CliError, CliResult};

/// Parse arguments, initialize logging, dispatch
pub async fn run() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    run_command(Cli::parse_args()).await
}
