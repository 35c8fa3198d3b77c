//! Request handlers
//!
//! Thin translation layer: decode the request, call the matching service,
//! map the outcome onto the wire error codes. The five domain errors pass
//! through unchanged from the core; everything else is INTERNAL_ERROR.

pub mod pull_requests;
pub mod stats;
pub mod teams;
pub mod users;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use prwheel_core::Error;

/// JSON error body: `{"error": {"code", "message"}}`
#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Wrapper making core errors (and payload rejections) usable as axum
/// responses.
pub enum ApiErr {
    Domain(Error),
    Invalid(String),
}

impl ApiErr {
    pub fn invalid(rejection: JsonRejection) -> Self {
        ApiErr::Invalid(rejection.to_string())
    }

    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiErr::Invalid(_) => (StatusCode::BAD_REQUEST, "INVALID_FORMAT"),
            ApiErr::Domain(err) => match err {
                Error::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                Error::AlreadyExists(_) => (StatusCode::CONFLICT, "ALREADY_EXISTS"),
                Error::PrMerged(_) => (StatusCode::CONFLICT, "PR_MERGED"),
                Error::NotAssigned { .. } => (StatusCode::CONFLICT, "NOT_ASSIGNED"),
                Error::NoCandidates(_) => (StatusCode::CONFLICT, "NO_CANDIDATES"),
                Error::Conflict(_) | Error::Storage(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
                }
            },
        }
    }
}

impl IntoResponse for ApiErr {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = match &self {
            ApiErr::Domain(err) => err.to_string(),
            ApiErr::Invalid(msg) => msg.clone(),
        };
        if status.is_server_error() {
            tracing::error!(code, %message, "request failed");
        } else {
            tracing::warn!(code, %message, "request rejected");
        }
        (
            status,
            Json(ErrorBody {
                error: ErrorDetail {
                    code: code.to_string(),
                    message,
                },
            }),
        )
            .into_response()
    }
}

impl From<Error> for ApiErr {
    fn from(err: Error) -> Self {
        ApiErr::Domain(err)
    }
}
