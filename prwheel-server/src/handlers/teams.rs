//! Team endpoints

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use prwheel_core::{Team, TeamMember};

use crate::handlers::ApiErr;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateTeamReq {
    pub team_name: String,
    pub members: Vec<TeamMemberReq>,
}

#[derive(Deserialize)]
pub struct TeamMemberReq {
    pub user_id: String,
    pub username: String,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Deserialize)]
pub struct TeamQuery {
    pub team_name: String,
}

/// POST /team/add
pub async fn add(
    State(state): State<AppState>,
    payload: Result<Json<CreateTeamReq>, JsonRejection>,
) -> Result<impl IntoResponse, ApiErr> {
    let Json(req) = payload.map_err(ApiErr::invalid)?;
    let team = Team {
        name: req.team_name,
        members: req
            .members
            .into_iter()
            .map(|m| TeamMember {
                user_id: m.user_id,
                user_name: m.username,
                is_active: m.is_active,
            })
            .collect(),
    };
    let team = state.teams.create(team).await?;
    Ok((StatusCode::CREATED, Json(json!({ "team": team }))))
}

/// GET /team/get?team_name=
pub async fn get(
    State(state): State<AppState>,
    Query(query): Query<TeamQuery>,
) -> Result<impl IntoResponse, ApiErr> {
    let team = state.teams.get(&query.team_name).await?;
    Ok(Json(json!({ "team": team })))
}
