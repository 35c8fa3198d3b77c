//! User endpoints

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::handlers::ApiErr;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SetActiveReq {
    pub user_id: String,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Deserialize)]
pub struct DeactivateReq {
    pub user_ids: Vec<String>,
}

#[derive(Deserialize)]
pub struct ReviewQuery {
    pub user_id: String,
}

/// POST /users/setIsActive
pub async fn set_active(
    State(state): State<AppState>,
    payload: Result<Json<SetActiveReq>, JsonRejection>,
) -> Result<impl IntoResponse, ApiErr> {
    let Json(req) = payload.map_err(ApiErr::invalid)?;
    let user = state.users.set_active(&req.user_id, req.is_active).await?;
    Ok(Json(json!({ "user": user })))
}

/// POST /users/deactivate
pub async fn deactivate(
    State(state): State<AppState>,
    payload: Result<Json<DeactivateReq>, JsonRejection>,
) -> Result<impl IntoResponse, ApiErr> {
    let Json(req) = payload.map_err(ApiErr::invalid)?;
    if req.user_ids.is_empty() {
        return Err(ApiErr::Invalid("user_ids must not be empty".to_string()));
    }
    state.users.deactivate(&req.user_ids).await?;
    Ok(Json(json!({ "deactivated": req.user_ids })))
}

/// GET /users/getReview?user_id=
pub async fn review_workload(
    State(state): State<AppState>,
    Query(query): Query<ReviewQuery>,
) -> Result<impl IntoResponse, ApiErr> {
    let prs = state.pull_requests.reviewer_workload(&query.user_id).await?;
    Ok(Json(json!({
        "user_id": query.user_id,
        "pull_requests": prs,
    })))
}
