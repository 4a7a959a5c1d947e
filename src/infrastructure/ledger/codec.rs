//! JSON encoding of the ledger artifact
//!
//! The artifact is a pretty-printed JSON array of team objects in storage
//! order. Decoding validates each record and the ledger invariants, so a file
//! that passes `decode_ledger` is a ledger the store can trust.

use crate::domain::team::{Ledger, Team};
use crate::domain::DomainError;

pub fn encode_ledger(ledger: &Ledger) -> Result<Vec<u8>, DomainError> {
    serde_json::to_vec_pretty(ledger.teams())
        .map_err(|e| DomainError::internal(format!("Failed to serialize ledger: {}", e)))
}

pub fn decode_ledger(bytes: &[u8]) -> Result<Ledger, DomainError> {
    let teams: Vec<Team> = serde_json::from_slice(bytes)
        .map_err(|e| DomainError::corrupt_state(format!("Malformed ledger: {}", e)))?;

    Ledger::from_teams(teams)
        .map_err(|e| DomainError::corrupt_state(format!("Invalid ledger: {}", e)))
}
