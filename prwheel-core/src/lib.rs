//! Prwheel Core - reviewer assignment engine
//!
//! This crate holds the domain model and the three assignment engines:
//! initial reviewer selection at pull-request creation, single-reviewer
//! reassignment, and the deactivation cascade that repairs every open
//! pull request a departing reviewer was assigned to.
//!
//! Persistence is abstracted behind the traits in [`store`]; the engines
//! keep no state of their own.

pub mod error;
pub mod memory;
pub mod models;
pub mod pick;
pub mod service;
pub mod store;

pub use error::{Error, Result};
pub use models::{PrStatus, PullRequest, PullRequestSummary, ReviewerStat, Team, TeamMember, User};
pub use pick::Picker;
pub use service::{PullRequestService, StatsService, TeamService, UserService};
pub use store::{PrStore, ReviewerRepair, StatsStore, TeamStore, UserStore};
