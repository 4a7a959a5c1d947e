//! Domain layer - core types and the ledger's rules

pub mod error;
pub mod team;

pub use error::DomainError;
pub use team::{Ledger, LedgerRepository, Team, TeamId};
