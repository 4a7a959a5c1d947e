//! CLI module for Shot Counter
//!
//! Provides subcommands:
//! - `serve`: run the scoreboard API server
//! - `check`: verify that the ledger file loads cleanly

pub mod check;
pub mod serve;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use config::ConfigBuilder;
use config::builder::DefaultState;

use crate::config::AppConfig;

/// Shot Counter - team scoreboard for drinking games
#[derive(Parser)]
#[command(name = "shotcounter")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the scoreboard API server
    Serve(serve::ServeArgs),

    /// Check the ledger file and print team counts
    Check(LedgerArgs),
}

/// Options shared by every command that touches the ledger
#[derive(Args, Clone, Debug, Default)]
pub struct LedgerArgs {
    /// Ledger file to use (overrides config)
    #[arg(long)]
    pub data_file: Option<PathBuf>,
}

impl LedgerArgs {
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(path) = &self.data_file {
            config.ledger.path = path.clone();
        }
    }
}

/// Load `.env` and layered configuration.
///
/// An invalid value anywhere fails the command; nothing falls back to defaults.
pub fn load_config() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    load_config_from(config::Config::builder())
}

fn load_config_from(builder: ConfigBuilder<DefaultState>) -> anyhow::Result<AppConfig> {
    AppConfig::load_with(builder).context("Failed to load configuration")
}
