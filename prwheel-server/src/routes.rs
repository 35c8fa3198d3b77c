//! Route table

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::handlers::{pull_requests, stats, teams, users};
use crate::state::AppState;

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/team/add", post(teams::add))
        .route("/team/get", get(teams::get))
        .route("/users/setIsActive", post(users::set_active))
        .route("/users/deactivate", post(users::deactivate))
        .route("/users/getReview", get(users::review_workload))
        .route("/pullRequest/create", post(pull_requests::create))
        .route("/pullRequest/merge", post(pull_requests::merge))
        .route("/pullRequest/reassign", post(pull_requests::reassign))
        .route("/stats", get(stats::top_reviewers))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    use prwheel_core::memory::MemoryStore;
    use prwheel_core::Picker;

    fn test_router(store: &MemoryStore, seed: u64) -> Router {
        let state = AppState::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(Picker::with_seed(seed)),
        );
        router(state)
    }

    async fn call(router: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = match body {
            Some(body) => Request::builder()
                .method(method)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        };
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn create_team_then_pr_end_to_end() {
        let store = MemoryStore::new();
        let app = test_router(&store, 1);

        let (status, _) = call(
            app.clone(),
            Method::POST,
            "/team/add",
            Some(json!({
                "team_name": "backend",
                "members": [
                    {"user_id": "u1", "username": "Ann", "is_active": true},
                    {"user_id": "u2", "username": "Bob", "is_active": true},
                    {"user_id": "u3", "username": "Cid", "is_active": true},
                ],
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = call(
            app.clone(),
            Method::POST,
            "/pullRequest/create",
            Some(json!({
                "pull_request_id": "pr-1",
                "pull_request_name": "Fix bug",
                "author_id": "u1",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let reviewers = body["pr"]["reviewers"].as_array().unwrap();
        assert_eq!(reviewers.len(), 2);
        assert!(!reviewers.iter().any(|r| r == "u1"));

        let (status, body) = call(app, Method::GET, "/team/get?team_name=backend", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["team"]["members"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn unknown_author_maps_to_404() {
        let store = MemoryStore::new();
        let app = test_router(&store, 1);

        let (status, body) = call(
            app,
            Method::POST,
            "/pullRequest/create",
            Some(json!({
                "pull_request_id": "pr-1",
                "pull_request_name": "Fix bug",
                "author_id": "ghost",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn malformed_payload_maps_to_400() {
        let store = MemoryStore::new();
        let app = test_router(&store, 1);

        let (status, body) = call(
            app,
            Method::POST,
            "/pullRequest/create",
            Some(json!({ "pull_request_id": "pr-1" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_FORMAT");
    }

    #[tokio::test]
    async fn empty_deactivation_batch_maps_to_400() {
        let store = MemoryStore::new();
        let app = test_router(&store, 1);

        let (status, body) = call(
            app,
            Method::POST,
            "/users/deactivate",
            Some(json!({ "user_ids": [] })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_FORMAT");
    }

    #[tokio::test]
    async fn reassign_on_merged_pr_maps_to_409() {
        let store = MemoryStore::new();
        let app = test_router(&store, 1);

        call(
            app.clone(),
            Method::POST,
            "/team/add",
            Some(json!({
                "team_name": "backend",
                "members": [
                    {"user_id": "u1", "username": "Ann", "is_active": true},
                    {"user_id": "u2", "username": "Bob", "is_active": true},
                ],
            })),
        )
        .await;
        call(
            app.clone(),
            Method::POST,
            "/pullRequest/create",
            Some(json!({
                "pull_request_id": "pr-1",
                "pull_request_name": "Fix bug",
                "author_id": "u1",
            })),
        )
        .await;
        let (status, _) = call(
            app.clone(),
            Method::POST,
            "/pullRequest/merge",
            Some(json!({ "pull_request_id": "pr-1" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = call(
            app,
            Method::POST,
            "/pullRequest/reassign",
            Some(json!({ "pull_request_id": "pr-1", "old_user_id": "u2" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "PR_MERGED");
    }

    #[tokio::test]
    async fn stats_lists_review_counts() {
        let store = MemoryStore::new();
        let app = test_router(&store, 1);

        call(
            app.clone(),
            Method::POST,
            "/team/add",
            Some(json!({
                "team_name": "backend",
                "members": [
                    {"user_id": "u1", "username": "Ann", "is_active": true},
                    {"user_id": "u2", "username": "Bob", "is_active": true},
                ],
            })),
        )
        .await;
        call(
            app.clone(),
            Method::POST,
            "/pullRequest/create",
            Some(json!({
                "pull_request_id": "pr-1",
                "pull_request_name": "Fix bug",
                "author_id": "u1",
            })),
        )
        .await;

        let (status, body) = call(app, Method::GET, "/stats", None).await;
        assert_eq!(status, StatusCode::OK);
        let stats = body["stats"].as_array().unwrap();
        assert_eq!(stats[0]["user_id"], "u2");
        assert_eq!(stats[0]["review_count"], 1);
    }
}
