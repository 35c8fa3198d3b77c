//! Domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A team and its denormalized member list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub members: Vec<TeamMember>,
}

/// Member entry as carried inside a team
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMember {
    pub user_id: String,
    #[serde(rename = "username")]
    pub user_name: String,
    pub is_active: bool,
}

/// A user; belongs to at most one team at a time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub team_name: String,
    pub is_active: bool,
}

/// Pull request lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrStatus {
    Open,
    Merged,
}

impl PrStatus {
    /// Stored string form
    pub fn as_str(&self) -> &'static str {
        match self {
            PrStatus::Open => "OPEN",
            PrStatus::Merged => "MERGED",
        }
    }
}

impl std::str::FromStr for PrStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(PrStatus::Open),
            "MERGED" => Ok(PrStatus::Merged),
            other => Err(format!("unknown pull request status: {other}")),
        }
    }
}

/// A pull request and its reviewer set.
///
/// The reviewer set never contains the author and never contains
/// duplicates; it is mutable only while the status is `Open`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    pub id: String,
    pub name: String,
    pub author_id: String,
    pub status: PrStatus,
    pub created_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
    pub reviewers: Vec<String>,
}

impl PullRequest {
    /// Whether the reviewer set may still be mutated
    pub fn is_open(&self) -> bool {
        self.status == PrStatus::Open
    }

    /// Whether the given user is currently on the reviewer set
    pub fn has_reviewer(&self, user_id: &str) -> bool {
        self.reviewers.iter().any(|r| r == user_id)
    }
}

/// Short pull request form returned by reviewer-workload listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestSummary {
    pub id: String,
    pub name: String,
    pub author_id: String,
    pub status: PrStatus,
}

/// Derived review-count aggregate; computed on demand, never persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewerStat {
    pub user_id: String,
    pub user_name: String,
    pub review_count: i64,
}
