//! Store-trait implementations, one repository per aggregate

mod pull_requests;
mod stats;
mod teams;
mod users;

#[cfg(test)]
pub(crate) mod tests_support;

pub use pull_requests::PrRepo;
pub use stats::StatsRepo;
pub use teams::TeamRepo;
pub use users::UserRepo;
