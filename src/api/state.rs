//! Application state for shared services

use std::sync::Arc;

use crate::infrastructure::team::TeamService;

/// Application state shared by every handler
#[derive(Clone, Debug)]
pub struct AppState {
    pub team_service: Arc<TeamService>,
}

impl AppState {
    pub fn new(team_service: Arc<TeamService>) -> Self {
        Self { team_service }
    }
}
