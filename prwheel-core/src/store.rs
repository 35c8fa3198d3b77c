//! Store traits the engines are written against
//!
//! Persistence lives behind these traits so the engines can be exercised
//! with in-memory doubles (see [`crate::memory`]) and so the atomicity
//! contracts are explicit at the boundary rather than implicit in SQL.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{PullRequest, PullRequestSummary, ReviewerStat, Team, User};

/// One reviewer-set repair decided by the deactivation cascade.
///
/// `Swap` carries compare-and-swap semantics: it applies only if `old` is
/// still on the pull request's reviewer set and the pull request is still
/// open at commit time. A store must abort the whole batch with
/// `Error::Conflict` if any repair's precondition no longer holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewerRepair {
    Swap {
        pr_id: String,
        old: String,
        new: String,
    },
    Remove {
        pr_id: String,
        reviewer: String,
    },
}

/// Directory of users and their active flags
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fetch a user by id; `Error::NotFound` if absent.
    async fn get_user(&self, id: &str) -> Result<User>;

    /// Set the active flag; returns the updated user, `Error::NotFound` if
    /// absent.
    async fn set_active(&self, id: &str, is_active: bool) -> Result<User>;

    /// All active members of a team. An unknown or empty team yields an
    /// empty list, never an error.
    async fn active_members(&self, team_name: &str) -> Result<Vec<User>>;

    /// Flip the active flag to false for every listed user and apply the
    /// cascade's reviewer repairs, all in one atomic unit: either every
    /// effect is visible or none are. Deactivating an unknown id is a
    /// silent no-op on the flag side.
    async fn bulk_deactivate(&self, ids: &[String], repairs: &[ReviewerRepair]) -> Result<()>;
}

/// Teams and their member rosters
#[async_trait]
pub trait TeamStore: Send + Sync {
    /// Create a team and upsert every listed member, all-or-nothing.
    /// `Error::AlreadyExists` if the team name is taken.
    async fn create_team(&self, team: &Team) -> Result<()>;

    /// Fetch a team with its full member list; `Error::NotFound` if absent.
    async fn get_team(&self, name: &str) -> Result<Team>;
}

/// Pull requests and their reviewer sets
#[async_trait]
pub trait PrStore: Send + Sync {
    /// Persist a new pull request with its initial reviewer set in one
    /// atomic unit. `Error::AlreadyExists` if the id is taken; the
    /// collision is detected at write time, not pre-checked.
    async fn create(&self, pr: &PullRequest) -> Result<()>;

    /// Fetch a pull request by id; `Error::NotFound` if absent.
    async fn get(&self, id: &str) -> Result<PullRequest>;

    /// Mark a pull request merged and stamp the merge time. Merging an
    /// already-merged pull request is idempotent and leaves the original
    /// merge time untouched. Returns the resulting record.
    async fn merge(&self, id: &str) -> Result<PullRequest>;

    /// Replace `old` with `new` on the reviewer set, compare-and-swap:
    /// fails with `Error::NotAssigned` if `old` is not present at write
    /// time and with `Error::PrMerged` if the pull request is no longer
    /// open, so neither a concurrent reassignment of the same slot nor a
    /// concurrent merge can be double-applied or overwritten.
    async fn swap_reviewer(&self, pr_id: &str, old: &str, new: &str) -> Result<()>;

    /// Drop a reviewer from the set; a no-op if they are not on it.
    async fn remove_reviewer(&self, pr_id: &str, reviewer: &str) -> Result<()>;

    /// Pull requests the user reviews, newest first.
    async fn list_by_reviewer(&self, user_id: &str) -> Result<Vec<PullRequestSummary>>;
}

/// Derived reviewer aggregates
#[async_trait]
pub trait StatsStore: Send + Sync {
    /// Top reviewers by total review assignments, descending.
    async fn top_reviewers(&self, limit: i64) -> Result<Vec<ReviewerStat>>;
}
