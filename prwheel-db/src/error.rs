//! sqlx-to-core error mapping

use prwheel_core::Error;

/// Map any sqlx failure to a retryable storage error.
pub(crate) fn storage(e: sqlx::Error) -> Error {
    Error::Storage(e.to_string())
}

/// Whether the failure is a unique-constraint violation. Used to turn id
/// collisions into `AlreadyExists` at write time instead of pre-checking.
pub(crate) fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}
