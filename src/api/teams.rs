//! Scoreboard endpoints consumed by the presentation and admin views

use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::team::Team;

/// Request to register a team
#[derive(Debug, Clone, Deserialize)]
pub struct AddTeamRequest {
    #[serde(default)]
    pub name: Option<String>,
}

/// Request to change a team's score.
///
/// `delta` is kept as raw JSON so that both `3` and `"3"` are accepted.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoreRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub delta: Option<Value>,
}

/// Team as returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamResponse {
    pub id: String,
    pub name: String,
    pub score: u64,
    pub hidden: bool,
}

impl From<&Team> for TeamResponse {
    fn from(team: &Team) -> Self {
        Self {
            id: team.id().as_str().to_string(),
            name: team.name().to_string(),
            score: team.score(),
            hidden: team.is_hidden(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTeamResponse {
    pub status: String,
    pub team: TeamResponse,
}

/// GET /api/teams
pub async fn list_teams(
    State(state): State<AppState>,
) -> Result<Json<Vec<TeamResponse>>, ApiError> {
    let teams = state.team_service.list_active().await?;

    Ok(Json(teams.iter().map(TeamResponse::from).collect()))
}

/// POST /api/team
pub async fn add_team(
    State(state): State<AppState>,
    Json(request): Json<AddTeamRequest>,
) -> Result<Json<AddTeamResponse>, ApiError> {
    let name = request.name.unwrap_or_default();
    debug!(name = %name, "Adding team");

    let team = state.team_service.add_team(&name).await?;

    Ok(Json(AddTeamResponse {
        status: "ok".to_string(),
        team: TeamResponse::from(&team),
    }))
}

/// POST /api/score
pub async fn change_score(
    State(state): State<AppState>,
    Json(request): Json<ScoreRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    let delta = parse_delta(request.delta.as_ref())?;
    let id = request
        .id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing team id"))?;
    debug!(id = %id, delta, "Changing score");

    state.team_service.adjust_score(&id, delta).await?;

    Ok(Json(StatusResponse::ok()))
}

/// POST /api/team/{team_id}/hide
pub async fn hide_team(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
) -> Result<Json<StatusResponse>, ApiError> {
    debug!(team_id = %team_id, "Hiding team");

    state.team_service.hide_team(&team_id).await?;

    Ok(Json(StatusResponse::ok()))
}

/// Read a score delta the way the admin view sends it.
///
/// Integers and integer strings are taken as-is. Fractional numbers are
/// truncated toward zero and booleans count as 0 or 1.
fn parse_delta(delta: Option<&Value>) -> Result<i64, ApiError> {
    let parsed = match delta {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        Some(Value::Bool(b)) => Some(i64::from(*b)),
        _ => None,
    };

    parsed.ok_or_else(|| ApiError::bad_request("Invalid delta"))
}
