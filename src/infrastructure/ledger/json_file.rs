//! File-backed ledger repository
//!
//! The whole ledger lives in one JSON file. Saves write a sibling temporary
//! file, sync it, and rename it over the target, so a load only ever sees the
//! previous or the next complete ledger.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error};

use super::codec::{decode_ledger, encode_ledger};
use crate::domain::team::{Ledger, LedgerRepository};
use crate::domain::DomainError;

#[derive(Debug, Clone)]
pub struct JsonFileLedgerRepository {
    path: PathBuf,
}

impl JsonFileLedgerRepository {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "ledger".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn write_atomic(&self, bytes: &[u8]) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let temp_path = self.temp_path();
        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(bytes).await?;
        file.sync_all().await?;
        drop(file);

        // Atomic rename
        if let Err(e) = fs::rename(&temp_path, &self.path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e);
        }

        self.sync_parent_dir().await
    }

    /// Flush the directory entry written by the rename
    #[cfg(unix)]
    async fn sync_parent_dir(&self) -> std::io::Result<()> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::File::open(parent).await?.sync_all().await
    }

    #[cfg(not(unix))]
    async fn sync_parent_dir(&self) -> std::io::Result<()> {
        Ok(())
    }
}

#[async_trait]
impl LedgerRepository for JsonFileLedgerRepository {
    async fn load(&self) -> Result<Ledger, DomainError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Ledger file absent, starting empty");
                return Ok(Ledger::new());
            }
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "Ledger file unreadable");
                return Err(DomainError::corrupt_state(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        let ledger = decode_ledger(&bytes).inspect_err(|e| {
            error!(path = %self.path.display(), error = %e, "Ledger file is corrupt");
        })?;

        debug!(path = %self.path.display(), teams = ledger.len(), "Loaded ledger");
        Ok(ledger)
    }

    async fn save(&self, ledger: &Ledger) -> Result<(), DomainError> {
        let bytes = encode_ledger(ledger)?;

        self.write_atomic(&bytes).await.map_err(|e| {
            DomainError::storage(format!("Failed to write {}: {}", self.path.display(), e))
        })?;

        debug!(path = %self.path.display(), teams = ledger.len(), "Saved ledger");
        Ok(())
    }

    async fn exists(&self) -> Result<bool, DomainError> {
        fs::try_exists(&self.path).await.map_err(|e| {
            DomainError::storage(format!("Failed to stat {}: {}", self.path.display(), e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, JsonFileLedgerRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = JsonFileLedgerRepository::new(temp_dir.path().join("teams.json"));
        (temp_dir, repo)
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_ledger() {
        let (_dir, repo) = setup();

        assert!(!repo.exists().await.unwrap());
        assert!(repo.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_and_reload() {
        let (_dir, repo) = setup();
        let mut ledger = Ledger::new();
        let alpha = ledger.add_team("Alpha").unwrap();
        ledger.add_team("Beta").unwrap();
        ledger.adjust_score(alpha.id().as_str(), 3).unwrap();
        ledger.hide_team(alpha.id().as_str()).unwrap();

        repo.save(&ledger).await.unwrap();

        assert!(repo.exists().await.unwrap());
        assert_eq!(repo.load().await.unwrap(), ledger);
        assert!(!repo.temp_path().exists());
    }

    #[tokio::test]
    async fn test_save_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let repo = JsonFileLedgerRepository::new(temp_dir.path().join("data/nested/teams.json"));

        repo.save(&Ledger::new()).await.unwrap();
        assert_eq!(std::fs::read(repo.path()).unwrap(), b"[]");
    }

    #[tokio::test]
    async fn test_save_replaces_existing_file() {
        let (_dir, repo) = setup();
        let mut ledger = Ledger::new();
        repo.save(&ledger).await.unwrap();

        ledger.add_team("Alpha").unwrap();
        repo.save(&ledger).await.unwrap();

        assert_eq!(repo.load().await.unwrap(), ledger);
        assert!(!repo.temp_path().exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_sync_parent_dir() {
        let (_dir, repo) = setup();
        repo.sync_parent_dir().await.unwrap();

        let relative = JsonFileLedgerRepository::new("teams.json");
        relative.sync_parent_dir().await.unwrap();
    }

    #[tokio::test]
    async fn test_corrupt_file_is_not_reset() {
        let (_dir, repo) = setup();
        std::fs::write(repo.path(), "{ not json").unwrap();

        let err = repo.load().await.unwrap_err();
        assert!(err.is_corrupt_state());
        assert_eq!(std::fs::read_to_string(repo.path()).unwrap(), "{ not json");
    }

    #[tokio::test]
    async fn test_unreadable_path_is_corrupt() {
        let temp_dir = TempDir::new().unwrap();
        // a directory where the file should be
        let repo = JsonFileLedgerRepository::new(temp_dir.path());

        let err = repo.load().await.unwrap_err();
        assert!(err.is_corrupt_state());
    }

    #[test]
    fn test_temp_path_is_sibling() {
        let repo = JsonFileLedgerRepository::new("/var/lib/shotcounter/teams.json");
        assert_eq!(
            repo.temp_path(),
            PathBuf::from("/var/lib/shotcounter/teams.json.tmp")
        );
    }
}
