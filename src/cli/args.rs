//! CLI argument definitions using clap
//!
//! Commands:
//! - rungate serve --config <path>
//! - rungate admin add <login> --config <path>
//! - rungate admin passwd <login> --config <path>
//! - rungate admin remove <login> --config <path>
//! - rungate admin list --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// rungate - a chat-administered execution gate for client application bundles
#[derive(Parser, Debug)]
#[command(name = "rungate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the gate server
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./rungate.json")]
        config: PathBuf,
    },

    /// Administrator provisioning (offline surface)
    #[command(subcommand)]
    Admin(AdminCommand),
}

#[derive(Subcommand, Debug)]
pub enum AdminCommand {
    /// Create an administrator (password read from stdin)
    Add {
        login: String,

        /// Path to configuration file
        #[arg(long, default_value = "./rungate.json")]
        config: PathBuf,
    },

    /// Reset an administrator's password (read from stdin)
    Passwd {
        login: String,

        /// Path to configuration file
        #[arg(long, default_value = "./rungate.json")]
        config: PathBuf,
    },

    /// Remove an administrator
    Remove {
        login: String,

        /// Path to configuration file
        #[arg(long, default_value = "./rungate.json")]
        config: PathBuf,
    },

    /// List administrator logins
    List {
        /// Path to configuration file
        #[arg(long, default_value = "./rungate.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
