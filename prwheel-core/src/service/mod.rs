//! Assignment engines and the supporting services
//!
//! Each service reads current state through the store traits, computes a
//! decision, and writes it back; the store is the single source of truth.

mod candidates;
mod pull_requests;
mod stats;
mod teams;
mod users;

pub use candidates::candidate_pool;
pub use pull_requests::PullRequestService;
pub use stats::StatsService;
pub use teams::TeamService;
pub use users::UserService;
