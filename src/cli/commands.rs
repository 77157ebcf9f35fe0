//! CLI command implementations
//!
//! `serve` boots the gate server; the `admin` subcommands are the
//! provisioning surface and talk directly to the credential store.

use std::path::Path;

use sqlx::SqlitePool;

use crate::auth::CredentialStore;
use crate::config::Config;
use crate::db;
use crate::gate::GateServer;
use crate::registry::BundleRegistry;

use super::args::{AdminCommand, Cli, Command};
use super::errors::CliResult;
use super::io::{confirm, prompt_nonempty};

/// Dispatch a parsed command line
pub async fn run_command(cli: Cli) -> CliResult<()> {
    match cli.command {
        Command::Serve { config } => serve(&config).await,
        Command::Admin(command) => admin(command).await,
    }
}

/// Load config, open the shared store, bootstrap the schema
async fn open_store(config_path: &Path) -> CliResult<(Config, SqlitePool)> {
    let config = Config::load(config_path)?;
    let pool = db::connect(&config.database_url).await?;
    db::init_schema(&pool).await?;
    Ok((config, pool))
}

/// Start the gate server
async fn serve(config_path: &Path) -> CliResult<()> {
    let (config, pool) = open_store(config_path).await?;

    let registry = BundleRegistry::new(pool);
    let server = GateServer::new(registry, config.gate);
    server.start().await?;

    Ok(())
}

/// Provisioning surface
async fn admin(command: AdminCommand) -> CliResult<()> {
    match command {
        AdminCommand::Add { login, config } => {
            let (_, pool) = open_store(&config).await?;
            let store = CredentialStore::new(pool);

            let password = prompt_nonempty("password>")?;
            store.create(&login, &password).await?;
            println!("Administrator '{}' created", login);
        }
        AdminCommand::Passwd { login, config } => {
            let (_, pool) = open_store(&config).await?;
            let store = CredentialStore::new(pool);

            let password = prompt_nonempty("new password>")?;
            store.change_password(&login, &password).await?;
            println!("Password updated for '{}'", login);
        }
        AdminCommand::Remove { login, config } => {
            let (_, pool) = open_store(&config).await?;
            let store = CredentialStore::new(pool);

            if confirm("are you sure? [y/n]>")? {
                store.remove(&login).await?;
                println!("Administrator '{}' removed", login);
            }
        }
        AdminCommand::List { config } => {
            let (_, pool) = open_store(&config).await?;
            let store = CredentialStore::new(pool);

            for login in store.list_logins().await? {
                println!("{}", login);
            }
        }
    }
    Ok(())
}
