use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use super::middleware::logging_middleware;
use super::{health, state::AppState, teams};

/// Create the full router with application state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // Scoreboard API
        .route("/api/teams", get(teams::list_teams))
        .route("/api/team", post(teams::add_team))
        .route("/api/score", post(teams::change_score))
        .route("/api/team/{team_id}/hide", post(teams::hide_team))
        .with_state(state)
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
}
