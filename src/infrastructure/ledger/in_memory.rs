//! In-memory ledger repository
//!
//! Keeps the encoded artifact bytes rather than a decoded ledger, so it goes
//! through the same codec as the file repository and tests can inspect
//! exactly what would have been persisted.

use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::codec::{decode_ledger, encode_ledger};
use crate::domain::team::{Ledger, LedgerRepository};
use crate::domain::DomainError;

/// Thread-safe in-memory ledger repository
///
/// Useful for testing and development. Data is lost when the process terminates.
#[derive(Debug, Default)]
pub struct InMemoryLedgerRepository {
    artifact: RwLock<Option<Vec<u8>>>,
    saves: AtomicUsize,
}

impl InMemoryLedgerRepository {
    /// Creates a repository with no artifact yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-populated with raw artifact bytes
    pub fn with_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            artifact: RwLock::new(Some(bytes.into())),
            saves: AtomicUsize::new(0),
        }
    }

    /// Current artifact bytes, if anything has been stored
    pub fn bytes(&self) -> Option<Vec<u8>> {
        self.artifact.read().ok().and_then(|a| a.clone())
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LedgerRepository for InMemoryLedgerRepository {
    async fn load(&self) -> Result<Ledger, DomainError> {
        let artifact = self.artifact.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        match artifact.as_deref() {
            Some(bytes) => decode_ledger(bytes),
            None => Ok(Ledger::new()),
        }
    }

    async fn save(&self, ledger: &Ledger) -> Result<(), DomainError> {
        let bytes = encode_ledger(ledger)?;
        let mut artifact = self.artifact.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        *artifact = Some(bytes);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn exists(&self) -> Result<bool, DomainError> {
        let artifact = self.artifact.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(artifact.is_some())
    }
}
