//! `lapgest` command-line client.

mod cli;
mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use std::{
    io::{self, IsTerminal},
    time::Duration,
};

use services::{ApiClient, ApiConfig, ApiContext, AuthProvider, QueryCache};
use utils::logging::{self, LogConfig};

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    logging::init(
        &LogConfig::from_verbosity(cli.verbose)
            .with_format(cli.log_format.into())
            .with_ansi(io::stderr().is_terminal()),
    );

    let mut config = ApiConfig::from_env().context("invalid API configuration")?;
    if let Some(url) = cli.api_url.clone() {
        config = config.with_base_url(url);
    }
    if let Some(secs) = cli.timeout_secs {
        config = config.with_timeout(Some(Duration::from_secs(secs)));
    }
    tracing::debug!(
        base_url = %config.base_url,
        timeout = ?config.timeout,
        "api configuration"
    );

    let client = ApiClient::new(config).context("failed to build HTTP client")?;
    let ctx = ApiContext::new(client.clone(), QueryCache::new());
    let auth = AuthProvider::new(client);

    match cli.command {
        Command::Session => commands::session(&auth).await,
        Command::Route { path } => commands::route(&auth, &path).await,
        Command::Lapins { sexe, breeding } => commands::lapins(&ctx, &auth, sexe, breeding).await,
        Command::Genealogy { id } => commands::genealogy(&ctx, &auth, id).await,
        Command::Planning { employe, date } => {
            commands::planning(&ctx, &auth, employe, date).await
        }
        Command::Absences { pending } => commands::absences(&ctx, &auth, pending).await,
        Command::Approve { id } => commands::decide_absence(&ctx, &auth, id, true).await,
        Command::Refuse { id } => commands::decide_absence(&ctx, &auth, id, false).await,
    }
}
