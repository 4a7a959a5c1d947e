//! Shot Counter
//!
//! Team scoreboard for drinking games:
//! - A durable JSON ledger of teams and scores
//! - A store that serializes every read-modify-write on that ledger
//! - A small JSON API for the presentation and admin views

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use infrastructure::ledger::JsonFileLedgerRepository;
use infrastructure::team::TeamService;

/// Build the ledger store for the configured ledger file
pub fn create_team_service(config: &AppConfig) -> Arc<TeamService> {
    let repository = Arc::new(JsonFileLedgerRepository::new(&config.ledger.path));
    Arc::new(TeamService::new(repository))
}
