//! Team infrastructure implementations

mod service;

pub use service::{LedgerSummary, TeamService};
