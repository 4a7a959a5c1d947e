//! Team service - the ledger store
//!
//! Every operation runs as load → validate/mutate → save while holding one
//! mutex, so two requests can never both act on the same stale ledger.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::team::{Ledger, LedgerRepository, Team};
use crate::domain::DomainError;

/// Counts reported by [`TeamService::summary`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerSummary {
    pub active: usize,
    pub hidden: usize,
}

/// Sole authority for reading and mutating team records
#[derive(Debug)]
pub struct TeamService {
    repository: Arc<dyn LedgerRepository>,
    lock: Mutex<()>,
}

impl TeamService {
    /// Create a new team service
    pub fn new(repository: Arc<dyn LedgerRepository>) -> Self {
        Self {
            repository,
            lock: Mutex::new(()),
        }
    }

    /// Verify the ledger loads and write an empty one if there is none yet
    pub async fn initialize(&self) -> Result<LedgerSummary, DomainError> {
        let _guard = self.lock.lock().await;
        let ledger = self.repository.load().await?;

        if !self.repository.exists().await? {
            info!("Creating empty ledger");
            self.repository.save(&ledger).await?;
        }

        Ok(summarize(&ledger))
    }

    /// Visible teams, highest score first; ties keep ledger order
    pub async fn list_active(&self) -> Result<Vec<Team>, DomainError> {
        let ledger = {
            let _guard = self.lock.lock().await;
            self.repository.load().await?
        };

        Ok(ledger.leaderboard())
    }

    /// Active and hidden team counts
    pub async fn summary(&self) -> Result<LedgerSummary, DomainError> {
        let ledger = {
            let _guard = self.lock.lock().await;
            self.repository.load().await?
        };

        Ok(summarize(&ledger))
    }

    /// Register a new team
    pub async fn add_team(&self, name: &str) -> Result<Team, DomainError> {
        let _guard = self.lock.lock().await;
        let mut ledger = self.repository.load().await?;

        let team = ledger.add_team(name).inspect_err(|e| {
            warn!(name = %name.trim(), error = %e, "Rejected new team");
        })?;
        self.repository.save(&ledger).await?;

        info!(id = %team.id(), name = %team.name(), "Added team");
        Ok(team)
    }

    /// Add `delta` to an active team's score, clamping at zero
    pub async fn adjust_score(&self, id: &str, delta: i64) -> Result<(), DomainError> {
        let _guard = self.lock.lock().await;
        let mut ledger = self.repository.load().await?;

        let score = ledger.adjust_score(id, delta).inspect_err(|e| {
            warn!(id = %id, delta, error = %e, "Rejected score change");
        })?;
        self.repository.save(&ledger).await?;

        info!(id = %id, delta, score, "Adjusted score");
        Ok(())
    }

    /// Hide a team from the leaderboard without deleting it
    pub async fn hide_team(&self, id: &str) -> Result<(), DomainError> {
        let _guard = self.lock.lock().await;
        let mut ledger = self.repository.load().await?;

        let changed = ledger.hide_team(id).inspect_err(|e| {
            warn!(id = %id, error = %e, "Rejected hide");
        })?;

        if changed {
            self.repository.save(&ledger).await?;
            info!(id = %id, "Hid team");
        } else {
            debug!(id = %id, "Team already hidden");
        }

        Ok(())
    }
}

fn summarize(ledger: &Ledger) -> LedgerSummary {
    let active = ledger.active().count();

    LedgerSummary {
        active,
        hidden: ledger.len() - active,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ledger::{InMemoryLedgerRepository, JsonFileLedgerRepository};
    use tempfile::TempDir;

    fn create_service() -> (Arc<InMemoryLedgerRepository>, TeamService) {
        let repo = Arc::new(InMemoryLedgerRepository::new());
        let service = TeamService::new(repo.clone());
        (repo, service)
    }

    fn names(teams: &[Team]) -> Vec<&str> {
        teams.iter().map(|t| t.name()).collect()
    }

    async fn score_of(service: &TeamService, id: &str) -> u64 {
        service
            .list_active()
            .await
            .unwrap()
            .into_iter()
            .find(|t| t.id().as_str() == id)
            .map(|t| t.score())
            .unwrap()
    }

    #[tokio::test]
    async fn test_add_and_list() {
        let (repo, service) = create_service();

        let team = service.add_team("  Alpha ").await.unwrap();
        assert_eq!(team.name(), "Alpha");
        assert_eq!(team.score(), 0);
        assert!(team.is_active());

        let teams = service.list_active().await.unwrap();
        assert_eq!(teams, vec![team]);
        assert_eq!(repo.save_count(), 1);
    }

    #[tokio::test]
    async fn test_add_empty_name() {
        let (repo, service) = create_service();

        let err = service.add_team(" \t").await.unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
        assert_eq!(repo.save_count(), 0);
    }

    #[tokio::test]
    async fn test_add_duplicate_name_case_insensitive() {
        let (_repo, service) = create_service();

        service.add_team("Alpha").await.unwrap();
        let err = service.add_team("alpha").await.unwrap_err();

        assert!(matches!(err, DomainError::Conflict { .. }));
        assert_eq!(service.list_active().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_add_same_name_after_hide() {
        let (_repo, service) = create_service();

        let first = service.add_team("Alpha").await.unwrap();
        service.hide_team(first.id().as_str()).await.unwrap();
        let second = service.add_team("alpha").await.unwrap();

        assert_ne!(first.id(), second.id());
        assert_eq!(names(&service.list_active().await.unwrap()), ["alpha"]);
        assert_eq!(
            service.summary().await.unwrap(),
            LedgerSummary {
                active: 1,
                hidden: 1
            }
        );
    }

    #[tokio::test]
    async fn test_adjust_score_clamps_at_zero() {
        let (_repo, service) = create_service();
        let team = service.add_team("Alpha").await.unwrap();
        let id = team.id().as_str();
        let mut expected: i64 = 0;

        for delta in [2, -1, -5, 3, 10, -4] {
            service.adjust_score(id, delta).await.unwrap();
            expected = (expected + delta).max(0);
            assert_eq!(score_of(&service, id).await, expected as u64);
        }
    }

    #[tokio::test]
    async fn test_adjust_score_unknown_id_leaves_artifact_untouched() {
        let (repo, service) = create_service();
        let team = service.add_team("Alpha").await.unwrap();
        service.adjust_score(team.id().as_str(), 2).await.unwrap();
        let before = repo.bytes().unwrap();

        let err = service.adjust_score("no-such-team", 1).await.unwrap_err();

        assert!(matches!(err, DomainError::NotFound { .. }));
        assert_eq!(repo.bytes().unwrap(), before);
        assert_eq!(repo.save_count(), 2);
    }

    #[tokio::test]
    async fn test_adjust_score_hidden_team() {
        let (_repo, service) = create_service();
        let team = service.add_team("Alpha").await.unwrap();
        service.hide_team(team.id().as_str()).await.unwrap();

        let err = service.adjust_score(team.id().as_str(), 1).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_hide_team_idempotent() {
        let (repo, service) = create_service();
        let alpha = service.add_team("Alpha").await.unwrap();
        service.add_team("Beta").await.unwrap();

        service.hide_team(alpha.id().as_str()).await.unwrap();
        assert_eq!(names(&service.list_active().await.unwrap()), ["Beta"]);

        let saves = repo.save_count();
        service.hide_team(alpha.id().as_str()).await.unwrap();
        assert_eq!(repo.save_count(), saves);

        let err = service.hide_team("no-such-team").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_active_sorted_with_stable_ties() {
        let (_repo, service) = create_service();
        let first = service.add_team("First Five").await.unwrap();
        let twenty = service.add_team("Twenty").await.unwrap();
        let second = service.add_team("Second Five").await.unwrap();

        service.adjust_score(first.id().as_str(), 5).await.unwrap();
        service.adjust_score(twenty.id().as_str(), 20).await.unwrap();
        service.adjust_score(second.id().as_str(), 5).await.unwrap();

        for _ in 0..5 {
            let teams = service.list_active().await.unwrap();
            assert_eq!(names(&teams), ["Twenty", "First Five", "Second Five"]);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_increments_are_not_lost() {
        let temp_dir = TempDir::new().unwrap();
        let repo = Arc::new(JsonFileLedgerRepository::new(
            temp_dir.path().join("teams.json"),
        ));
        let service = Arc::new(TeamService::new(repo));
        let team = service.add_team("Alpha").await.unwrap();
        service.adjust_score(team.id().as_str(), 7).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..64 {
            let service = service.clone();
            let id = team.id().to_string();
            handles.push(tokio::spawn(async move {
                service.adjust_score(&id, 1).await
            }));
        }

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(score_of(&service, team.id().as_str()).await, 7 + 64);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_adds_with_same_name() {
        let (_repo, service) = create_service();
        let service = Arc::new(service);

        let mut handles = Vec::new();
        for i in 0..16 {
            let service = service.clone();
            let name = if i % 2 == 0 { "Alpha" } else { "ALPHA" };
            handles.push(tokio::spawn(async move { service.add_team(name).await }));
        }

        let mut created = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(DomainError::Conflict { .. }) => {}
                Err(e) => panic!("unexpected error: {e}"),
            }
        }

        assert_eq!(created, 1);
        assert_eq!(service.list_active().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_ledger_blocks_every_operation() {
        let repo = Arc::new(InMemoryLedgerRepository::with_bytes("not json"));
        let service = TeamService::new(repo.clone());

        assert!(service.list_active().await.unwrap_err().is_corrupt_state());
        assert!(service.add_team("Alpha").await.unwrap_err().is_corrupt_state());
        assert!(service.adjust_score("a", 1).await.unwrap_err().is_corrupt_state());
        assert!(service.hide_team("a").await.unwrap_err().is_corrupt_state());
        assert!(service.initialize().await.unwrap_err().is_corrupt_state());

        assert_eq!(repo.bytes().unwrap(), b"not json");
        assert_eq!(repo.save_count(), 0);
    }

    #[tokio::test]
    async fn test_initialize_creates_empty_ledger_once() {
        let (repo, service) = create_service();

        let summary = service.initialize().await.unwrap();
        assert_eq!(summary, LedgerSummary { active: 0, hidden: 0 });
        assert_eq!(repo.bytes().unwrap(), b"[]");

        service.add_team("Alpha").await.unwrap();
        service.initialize().await.unwrap();
        assert_eq!(repo.save_count(), 2);
    }

    #[tokio::test]
    async fn test_reload_from_file_reproduces_ledger() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("teams.json");

        let service = TeamService::new(Arc::new(JsonFileLedgerRepository::new(&path)));
        let alpha = service.add_team("Alpha").await.unwrap();
        let beta = service.add_team("Beta").await.unwrap();
        service.adjust_score(beta.id().as_str(), 3).await.unwrap();
        service.hide_team(alpha.id().as_str()).await.unwrap();
        let before = service.list_active().await.unwrap();

        let reopened = TeamService::new(Arc::new(JsonFileLedgerRepository::new(&path)));
        assert_eq!(reopened.list_active().await.unwrap(), before);
        assert_eq!(
            reopened.summary().await.unwrap(),
            LedgerSummary {
                active: 1,
                hidden: 1
            }
        );
    }
}
