//! In-memory store doubles
//!
//! A single map-backed store implementing every store trait, used by the
//! engine tests and anywhere a real database is unwanted. All trait
//! methods take one lock, so each call is atomic the same way a database
//! transaction is.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use crate::error::{Error, Result};
use crate::models::{
    PrStatus, PullRequest, PullRequestSummary, ReviewerStat, Team, TeamMember, User,
};
use crate::store::{PrStore, ReviewerRepair, StatsStore, TeamStore, UserStore};

#[derive(Default)]
struct Inner {
    teams: Vec<String>,
    users: HashMap<String, User>,
    prs: HashMap<String, PullRequest>,
}

/// Map-backed store; clones share the same state.
#[derive(Default, Clone)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user directly, bypassing team creation.
    pub fn insert_user(&self, user: User) {
        let mut inner = self.inner.lock().expect("memory store lock poisoned");
        inner.users.insert(user.id.clone(), user);
    }

    /// Seed a pull request directly, bypassing the assignment engine.
    pub fn insert_pr(&self, pr: PullRequest) {
        let mut inner = self.inner.lock().expect("memory store lock poisoned");
        inner.prs.insert(pr.id.clone(), pr);
    }

    /// Snapshot a pull request for assertions.
    pub fn pr(&self, id: &str) -> Option<PullRequest> {
        let inner = self.inner.lock().expect("memory store lock poisoned");
        inner.prs.get(id).cloned()
    }

    /// Snapshot a user for assertions.
    pub fn user(&self, id: &str) -> Option<User> {
        let inner = self.inner.lock().expect("memory store lock poisoned");
        inner.users.get(id).cloned()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn get_user(&self, id: &str) -> Result<User> {
        let inner = self.inner.lock().expect("memory store lock poisoned");
        inner
            .users
            .get(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("user {id}")))
    }

    async fn set_active(&self, id: &str, is_active: bool) -> Result<User> {
        let mut inner = self.inner.lock().expect("memory store lock poisoned");
        let user = inner
            .users
            .get_mut(id)
            .ok_or_else(|| Error::NotFound(format!("user {id}")))?;
        user.is_active = is_active;
        Ok(user.clone())
    }

    async fn active_members(&self, team_name: &str) -> Result<Vec<User>> {
        let inner = self.inner.lock().expect("memory store lock poisoned");
        let mut members: Vec<User> = inner
            .users
            .values()
            .filter(|u| u.team_name == team_name && u.is_active)
            .cloned()
            .collect();
        members.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(members)
    }

    async fn bulk_deactivate(&self, ids: &[String], repairs: &[ReviewerRepair]) -> Result<()> {
        let mut inner = self.inner.lock().expect("memory store lock poisoned");

        // Validate every repair precondition before touching anything so
        // the batch stays all-or-nothing.
        for repair in repairs {
            match repair {
                ReviewerRepair::Swap { pr_id, old, new } => {
                    let pr = inner
                        .prs
                        .get(pr_id)
                        .ok_or_else(|| Error::Conflict(format!("pull request {pr_id} vanished")))?;
                    if !pr.is_open() {
                        return Err(Error::Conflict(format!(
                            "pull request {pr_id} is no longer open"
                        )));
                    }
                    if !pr.has_reviewer(old) {
                        return Err(Error::Conflict(format!(
                            "reviewer {old} no longer on pull request {pr_id}"
                        )));
                    }
                    if pr.has_reviewer(new) {
                        return Err(Error::Conflict(format!(
                            "reviewer {new} already on pull request {pr_id}"
                        )));
                    }
                }
                ReviewerRepair::Remove { .. } => {}
            }
        }

        for id in ids {
            if let Some(user) = inner.users.get_mut(id) {
                user.is_active = false;
            }
        }

        for repair in repairs {
            match repair {
                ReviewerRepair::Swap { pr_id, old, new } => {
                    if let Some(pr) = inner.prs.get_mut(pr_id) {
                        if let Some(slot) = pr.reviewers.iter_mut().find(|r| *r == old) {
                            *slot = new.clone();
                        }
                    }
                }
                ReviewerRepair::Remove { pr_id, reviewer } => {
                    if let Some(pr) = inner.prs.get_mut(pr_id) {
                        pr.reviewers.retain(|r| r != reviewer);
                    }
                }
            }
        }

        Ok(())
    }
}

#[async_trait]
impl TeamStore for MemoryStore {
    async fn create_team(&self, team: &Team) -> Result<()> {
        let mut inner = self.inner.lock().expect("memory store lock poisoned");
        if inner.teams.iter().any(|t| t == &team.name) {
            return Err(Error::AlreadyExists(format!("team {}", team.name)));
        }
        inner.teams.push(team.name.clone());
        for member in &team.members {
            inner.users.insert(
                member.user_id.clone(),
                User {
                    id: member.user_id.clone(),
                    name: member.user_name.clone(),
                    team_name: team.name.clone(),
                    is_active: member.is_active,
                },
            );
        }
        Ok(())
    }

    async fn get_team(&self, name: &str) -> Result<Team> {
        let inner = self.inner.lock().expect("memory store lock poisoned");
        if !inner.teams.iter().any(|t| t == name) {
            return Err(Error::NotFound(format!("team {name}")));
        }
        let mut members: Vec<TeamMember> = inner
            .users
            .values()
            .filter(|u| u.team_name == name)
            .map(|u| TeamMember {
                user_id: u.id.clone(),
                user_name: u.name.clone(),
                is_active: u.is_active,
            })
            .collect();
        members.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        Ok(Team {
            name: name.to_string(),
            members,
        })
    }
}

#[async_trait]
impl PrStore for MemoryStore {
    async fn create(&self, pr: &PullRequest) -> Result<()> {
        let mut inner = self.inner.lock().expect("memory store lock poisoned");
        if inner.prs.contains_key(&pr.id) {
            return Err(Error::AlreadyExists(format!("pull request {}", pr.id)));
        }
        inner.prs.insert(pr.id.clone(), pr.clone());
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<PullRequest> {
        let inner = self.inner.lock().expect("memory store lock poisoned");
        inner
            .prs
            .get(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("pull request {id}")))
    }

    async fn merge(&self, id: &str) -> Result<PullRequest> {
        let mut inner = self.inner.lock().expect("memory store lock poisoned");
        let pr = inner
            .prs
            .get_mut(id)
            .ok_or_else(|| Error::NotFound(format!("pull request {id}")))?;
        if pr.status == PrStatus::Open {
            pr.status = PrStatus::Merged;
            pr.merged_at = Some(Utc::now());
        }
        Ok(pr.clone())
    }

    async fn swap_reviewer(&self, pr_id: &str, old: &str, new: &str) -> Result<()> {
        let mut inner = self.inner.lock().expect("memory store lock poisoned");
        let pr = inner
            .prs
            .get_mut(pr_id)
            .ok_or_else(|| Error::NotFound(format!("pull request {pr_id}")))?;
        if !pr.is_open() {
            return Err(Error::PrMerged(pr_id.to_string()));
        }
        if pr.has_reviewer(new) {
            return Err(Error::Conflict(format!(
                "reviewer {new} already on pull request {pr_id}"
            )));
        }
        match pr.reviewers.iter_mut().find(|r| *r == old) {
            Some(slot) => {
                *slot = new.to_string();
                Ok(())
            }
            None => Err(Error::NotAssigned {
                pr: pr_id.to_string(),
                user: old.to_string(),
            }),
        }
    }

    async fn remove_reviewer(&self, pr_id: &str, reviewer: &str) -> Result<()> {
        let mut inner = self.inner.lock().expect("memory store lock poisoned");
        if let Some(pr) = inner.prs.get_mut(pr_id) {
            pr.reviewers.retain(|r| r != reviewer);
        }
        Ok(())
    }

    async fn list_by_reviewer(&self, user_id: &str) -> Result<Vec<PullRequestSummary>> {
        let inner = self.inner.lock().expect("memory store lock poisoned");
        let mut prs: Vec<&PullRequest> = inner
            .prs
            .values()
            .filter(|pr| pr.has_reviewer(user_id))
            .collect();
        prs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(prs
            .into_iter()
            .map(|pr| PullRequestSummary {
                id: pr.id.clone(),
                name: pr.name.clone(),
                author_id: pr.author_id.clone(),
                status: pr.status,
            })
            .collect())
    }
}

#[async_trait]
impl StatsStore for MemoryStore {
    async fn top_reviewers(&self, limit: i64) -> Result<Vec<ReviewerStat>> {
        let inner = self.inner.lock().expect("memory store lock poisoned");
        let mut stats: Vec<ReviewerStat> = inner
            .users
            .values()
            .map(|u| ReviewerStat {
                user_id: u.id.clone(),
                user_name: u.name.clone(),
                review_count: inner
                    .prs
                    .values()
                    .filter(|pr| pr.has_reviewer(&u.id))
                    .count() as i64,
            })
            .collect();
        stats.sort_by(|a, b| {
            b.review_count
                .cmp(&a.review_count)
                .then_with(|| a.user_id.cmp(&b.user_id))
        });
        stats.truncate(limit as usize);
        Ok(stats)
    }
}
