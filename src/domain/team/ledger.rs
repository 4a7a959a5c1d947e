//! The ledger: the full ordered collection of team records
//!
//! Every mutation here is in-memory only. Persisting the result and keeping
//! the load/mutate/save sequence exclusive is the job of the ledger store.

use std::collections::HashSet;

use super::entity::{Team, TeamId};
use super::validation::{names_collide, normalize_team_name, validate_stored_team_name};
use crate::domain::DomainError;

/// Ledger invariant violations found in persisted data
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LedgerInvariantError {
    #[error("duplicate team id '{0}'")]
    DuplicateId(String),

    #[error("active teams share the name '{0}'")]
    DuplicateActiveName(String),

    #[error("team '{id}' has an invalid name: {reason}")]
    InvalidName { id: String, reason: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    teams: Vec<Team>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger from decoded records, checking every ledger invariant
    pub fn from_teams(teams: Vec<Team>) -> Result<Self, LedgerInvariantError> {
        let mut ids = HashSet::with_capacity(teams.len());
        let mut active_names = HashSet::new();

        for team in &teams {
            if let Err(e) = validate_stored_team_name(team.name()) {
                return Err(LedgerInvariantError::InvalidName {
                    id: team.id().to_string(),
                    reason: e.to_string(),
                });
            }

            if !ids.insert(team.id().as_str()) {
                return Err(LedgerInvariantError::DuplicateId(team.id().to_string()));
            }

            if team.is_active() && !active_names.insert(team.name().to_lowercase()) {
                return Err(LedgerInvariantError::DuplicateActiveName(
                    team.name().to_string(),
                ));
            }
        }

        Ok(Self { teams })
    }

    /// All records in storage order, hidden ones included
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn active(&self) -> impl Iterator<Item = &Team> {
        self.teams.iter().filter(|t| t.is_active())
    }

    /// Visible teams ordered by score, highest first.
    ///
    /// Teams with equal scores keep their storage order (`sort_by` is stable).
    pub fn leaderboard(&self) -> Vec<Team> {
        let mut visible: Vec<Team> = self.active().cloned().collect();
        visible.sort_by(|a, b| b.score().cmp(&a.score()));
        visible
    }

    pub fn find(&self, id: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.id().as_str() == id)
    }

    fn find_active_mut(&mut self, id: &str) -> Option<&mut Team> {
        self.teams
            .iter_mut()
            .find(|t| t.is_active() && t.id().as_str() == id)
    }

    /// Register a new team and return a copy of it
    pub fn add_team(&mut self, raw_name: &str) -> Result<Team, DomainError> {
        let name =
            normalize_team_name(raw_name).map_err(|e| DomainError::validation(e.to_string()))?;

        if self.active().any(|t| names_collide(t.name(), name)) {
            return Err(DomainError::conflict(format!(
                "Team '{}' already exists",
                name
            )));
        }

        let id = self.allocate_id();
        let team = Team::new(id, name).map_err(|e| DomainError::validation(e.to_string()))?;
        self.teams.push(team.clone());

        Ok(team)
    }

    /// Add `delta` to an active team's score, clamping at zero. Returns the new score.
    pub fn adjust_score(&mut self, id: &str, delta: i64) -> Result<u64, DomainError> {
        let team = self
            .find_active_mut(id)
            .ok_or_else(|| DomainError::not_found(format!("Team '{}' not found", id)))?;

        Ok(team.apply_delta(delta))
    }

    /// Hide a team, visible or not. Returns false if it was already hidden.
    pub fn hide_team(&mut self, id: &str) -> Result<bool, DomainError> {
        let team = self
            .teams
            .iter_mut()
            .find(|t| t.id().as_str() == id)
            .ok_or_else(|| DomainError::not_found(format!("Team '{}' not found", id)))?;

        Ok(team.hide())
    }

    fn allocate_id(&self) -> TeamId {
        loop {
            let id = TeamId::generate();

            if self.find(id.as_str()).is_none() {
                return id;
            }
        }
    }
}

impl From<Ledger> for Vec<Team> {
    fn from(ledger: Ledger) -> Self {
        ledger.teams
    }
}
