//! Pull request endpoints

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::handlers::ApiErr;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreatePrReq {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
}

#[derive(Deserialize)]
pub struct MergePrReq {
    pub pull_request_id: String,
}

#[derive(Deserialize)]
pub struct ReassignPrReq {
    pub pull_request_id: String,
    pub old_user_id: String,
}

/// POST /pullRequest/create
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreatePrReq>, JsonRejection>,
) -> Result<impl IntoResponse, ApiErr> {
    let Json(req) = payload.map_err(ApiErr::invalid)?;
    let pr = state
        .pull_requests
        .create(&req.pull_request_id, &req.pull_request_name, &req.author_id)
        .await?;
    Ok((StatusCode::CREATED, Json(json!({ "pr": pr }))))
}

/// POST /pullRequest/merge
pub async fn merge(
    State(state): State<AppState>,
    payload: Result<Json<MergePrReq>, JsonRejection>,
) -> Result<impl IntoResponse, ApiErr> {
    let Json(req) = payload.map_err(ApiErr::invalid)?;
    let pr = state.pull_requests.merge(&req.pull_request_id).await?;
    Ok(Json(json!({ "pr": pr })))
}

/// POST /pullRequest/reassign
pub async fn reassign(
    State(state): State<AppState>,
    payload: Result<Json<ReassignPrReq>, JsonRejection>,
) -> Result<impl IntoResponse, ApiErr> {
    let Json(req) = payload.map_err(ApiErr::invalid)?;
    let (new_reviewer, pr) = state
        .pull_requests
        .reassign(&req.pull_request_id, &req.old_user_id)
        .await?;
    Ok(Json(json!({ "pr": pr, "replaced_by": new_reviewer })))
}
