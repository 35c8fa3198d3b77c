//! Seeding helpers shared by the repository tests

use chrono::Utc;

use prwheel_core::{PrStatus, PrStore, PullRequest, Team, TeamMember, TeamStore};

use crate::Database;

/// Create a team with the given (user id, active) members.
pub(crate) async fn seed_team(db: &Database, name: &str, members: &[(&str, bool)]) {
    let team = Team {
        name: name.to_string(),
        members: members
            .iter()
            .map(|(id, active)| TeamMember {
                user_id: id.to_string(),
                user_name: id.to_uppercase(),
                is_active: *active,
            })
            .collect(),
    };
    db.teams().create_team(&team).await.unwrap();
}

/// Create an open pull request with a fixed reviewer set.
pub(crate) async fn seed_pr(db: &Database, id: &str, author: &str, reviewers: &[&str]) {
    let pr = PullRequest {
        id: id.to_string(),
        name: format!("{id} title"),
        author_id: author.to_string(),
        status: PrStatus::Open,
        created_at: Utc::now(),
        merged_at: None,
        reviewers: reviewers.iter().map(|r| r.to_string()).collect(),
    };
    db.pull_requests().create(&pr).await.unwrap();
}
