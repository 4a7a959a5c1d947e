//! Team domain module
//!
//! Teams are the scoreboard entries. They live in a single ledger that is
//! loaded and saved as a whole; teams are hidden rather than deleted.

mod entity;
mod ledger;
mod repository;
mod validation;

pub use entity::{Team, TeamId};
pub use ledger::{Ledger, LedgerInvariantError};
pub use repository::LedgerRepository;
pub use validation::{
    TeamValidationError, names_collide, normalize_team_name, validate_team_id, validate_team_name,
};
