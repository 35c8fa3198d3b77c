//! Error types for reviewer assignment operations

use thiserror::Error;

/// Result type alias for assignment operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for assignment operations.
///
/// The first five variants are expected, caller-actionable outcomes and map
/// directly to API error codes. `Conflict` and `Storage` are internal and
/// safe to retry; the engines never fold them into a domain variant.
#[derive(Error, Debug)]
pub enum Error {
    /// Referenced user, team, or pull request does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Id collision on creation
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// Mutation attempted on a merged pull request
    #[error("pull request {0} is merged")]
    PrMerged(String),

    /// The reviewer being replaced is not on the pull request
    #[error("user {user} is not a reviewer on pull request {pr}")]
    NotAssigned { pr: String, user: String },

    /// No eligible replacement reviewer exists
    #[error("no replacement candidates for pull request {0}")]
    NoCandidates(String),

    /// A concurrent operation invalidated this one mid-flight
    #[error("storage conflict: {0}")]
    Conflict(String),

    /// Underlying store failure
    #[error("storage error: {0}")]
    Storage(String),
}

impl Error {
    /// Whether the caller may retry the operation unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Conflict(_) | Error::Storage(_))
    }
}
