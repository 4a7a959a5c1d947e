//! Ledger repository trait

use async_trait::async_trait;

use super::ledger::Ledger;
use crate::domain::DomainError;

/// Durable home of the whole ledger.
///
/// Implementations read and write the complete record set as one unit and must
/// never expose a partially written ledger to `load`. They do no locking of
/// their own; callers serialize access.
#[async_trait]
pub trait LedgerRepository: Send + Sync + std::fmt::Debug {
    /// Load the ledger. A missing artifact is an empty ledger; an unreadable
    /// or malformed one is `DomainError::CorruptState`.
    async fn load(&self) -> Result<Ledger, DomainError>;

    /// Replace the persisted ledger with `ledger`
    async fn save(&self, ledger: &Ledger) -> Result<(), DomainError>;

    /// Check whether the durable artifact exists yet
    async fn exists(&self) -> Result<bool, DomainError>;
}
