//! Team entity and related types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{TeamValidationError, normalize_team_name, validate_team_id};

/// Team identifier - opaque, assigned once by the ledger and never reused
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TeamId(String);

impl TeamId {
    /// Create a TeamId from an existing value after validation
    pub fn new(id: impl Into<String>) -> Result<Self, TeamValidationError> {
        let id = id.into();
        validate_team_id(&id)?;
        Ok(Self(id))
    }

    /// Allocate a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TeamId {
    type Error = TeamValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TeamId> for String {
    fn from(id: TeamId) -> Self {
        id.0
    }
}

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Team record as kept in the ledger.
///
/// The serialized shape is exactly the four persisted fields; anything else in
/// the ledger file is rejected when decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Team {
    id: TeamId,
    name: String,
    score: u64,
    hidden: bool,
}

impl Team {
    /// Create a new visible team with a zero score
    pub fn new(id: TeamId, name: &str) -> Result<Self, TeamValidationError> {
        let name = normalize_team_name(name)?;

        Ok(Self {
            id,
            name: name.to_string(),
            score: 0,
            hidden: false,
        })
    }

    // Getters

    pub fn id(&self) -> &TeamId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn is_active(&self) -> bool {
        !self.hidden
    }

    // Mutators

    /// Apply a signed delta, clamping at zero. Returns the new score.
    pub fn apply_delta(&mut self, delta: i64) -> u64 {
        self.score = if delta >= 0 {
            self.score.saturating_add(delta.unsigned_abs())
        } else {
            self.score.saturating_sub(delta.unsigned_abs())
        };
        self.score
    }

    /// Hide the team. Returns false if it was already hidden.
    pub fn hide(&mut self) -> bool {
        let changed = !self.hidden;
        self.hidden = true;
        changed
    }
}
