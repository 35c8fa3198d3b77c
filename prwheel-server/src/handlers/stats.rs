//! Reviewer stats endpoint

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::handlers::ApiErr;
use crate::state::AppState;

/// GET /stats
pub async fn top_reviewers(State(state): State<AppState>) -> Result<impl IntoResponse, ApiErr> {
    let stats = state.stats.top_reviewers().await?;
    Ok(Json(json!({ "stats": stats })))
}
