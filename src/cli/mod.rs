//! Command-line interface wiring for crimescope.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::Settings;

pub mod check;
pub mod fetch;
pub mod serve;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(author, version, about = "FBI crime statistics dashboard backend", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Dispatch the selected sub-command.
    pub async fn dispatch(self, settings: Settings) -> Result<()> {
        match self.command {
            Commands::Fetch(args) => fetch::run(args, settings).await,
            Commands::Check(args) => check::run(args, settings).await,
            Commands::Serve(args) => serve::run(args, settings).await,
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Query crime estimates for an agency and print the series.
    Fetch(fetch::Args),
    /// Probe the web server, internet, statistics API, and database.
    Check(check::Args),
    /// Serve the JSON API and static UI.
    Serve(serve::Args),
}
