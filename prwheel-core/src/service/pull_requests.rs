//! Pull request lifecycle: creation with initial reviewer assignment,
//! merge, and single-reviewer reassignment.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::models::{PrStatus, PullRequest, PullRequestSummary};
use crate::pick::Picker;
use crate::service::candidates::candidate_pool;
use crate::store::{PrStore, UserStore};

/// How many reviewers a new pull request gets when the team is big enough
const REVIEWERS_PER_PR: usize = 2;

/// Creates pull requests, merges them, and swaps single reviewers.
pub struct PullRequestService {
    prs: Arc<dyn PrStore>,
    users: Arc<dyn UserStore>,
    picker: Arc<Picker>,
}

impl PullRequestService {
    pub fn new(prs: Arc<dyn PrStore>, users: Arc<dyn UserStore>, picker: Arc<Picker>) -> Self {
        Self { prs, users, picker }
    }

    /// Create a pull request and assign its initial reviewers.
    ///
    /// Reviewers are drawn uniformly without replacement from the author's
    /// active teammates; with two or fewer eligible teammates, all of them
    /// are assigned. The author is never eligible.
    pub async fn create(&self, id: &str, name: &str, author_id: &str) -> Result<PullRequest> {
        info!(pr_id = %id, author_id = %author_id, "creating pull request");

        let author = self.users.get_user(author_id).await.map_err(|e| {
            if matches!(e, Error::NotFound(_)) {
                warn!(author_id = %author_id, "author not found");
            }
            e
        })?;

        let members = self.users.active_members(&author.team_name).await?;
        let exclude: HashSet<&str> = [author_id].into_iter().collect();
        let pool = candidate_pool(&members, &exclude);
        let reviewers = self.picker.up_to(&pool, REVIEWERS_PER_PR);

        let pr = PullRequest {
            id: id.to_string(),
            name: name.to_string(),
            author_id: author_id.to_string(),
            status: PrStatus::Open,
            created_at: Utc::now(),
            merged_at: None,
            reviewers,
        };

        self.prs.create(&pr).await.map_err(|e| {
            if matches!(e, Error::AlreadyExists(_)) {
                warn!(pr_id = %id, "pull request id already taken");
            }
            e
        })?;

        Ok(pr)
    }

    /// Mark a pull request merged. Idempotent on an already-merged one.
    pub async fn merge(&self, id: &str) -> Result<PullRequest> {
        info!(pr_id = %id, "merging pull request");
        self.prs.merge(id).await
    }

    /// Replace one reviewer on an open pull request with a uniformly drawn
    /// eligible teammate. Returns the new reviewer's id and the updated
    /// pull request.
    ///
    /// The stored swap is compare-and-swap, so if a concurrent operation
    /// already replaced the same reviewer this fails with `NotAssigned`
    /// instead of double-applying.
    pub async fn reassign(&self, pr_id: &str, old_user_id: &str) -> Result<(String, PullRequest)> {
        info!(pr_id = %pr_id, old_reviewer = %old_user_id, "reassigning reviewer");

        let mut pr = self.prs.get(pr_id).await.map_err(|e| {
            if matches!(e, Error::NotFound(_)) {
                warn!(pr_id = %pr_id, "pull request not found");
            }
            e
        })?;

        if !pr.is_open() {
            warn!(pr_id = %pr_id, "pull request already merged");
            return Err(Error::PrMerged(pr_id.to_string()));
        }

        if !pr.has_reviewer(old_user_id) {
            warn!(pr_id = %pr_id, user_id = %old_user_id, "user is not a reviewer");
            return Err(Error::NotAssigned {
                pr: pr_id.to_string(),
                user: old_user_id.to_string(),
            });
        }

        let author = self.users.get_user(&pr.author_id).await?;
        let members = self.users.active_members(&author.team_name).await?;

        let mut exclude: HashSet<&str> = HashSet::new();
        exclude.insert(pr.author_id.as_str());
        exclude.insert(old_user_id);
        for reviewer in &pr.reviewers {
            exclude.insert(reviewer.as_str());
        }
        let pool = candidate_pool(&members, &exclude);

        let new_reviewer = match self.picker.one(&pool) {
            Some(id) => id,
            None => {
                warn!(pr_id = %pr_id, "no replacement candidates");
                return Err(Error::NoCandidates(pr_id.to_string()));
            }
        };

        self.prs
            .swap_reviewer(pr_id, old_user_id, &new_reviewer)
            .await?;

        if let Some(slot) = pr.reviewers.iter_mut().find(|r| *r == old_user_id) {
            *slot = new_reviewer.clone();
        }

        Ok((new_reviewer, pr))
    }

    /// Pull requests the user currently reviews, newest first.
    pub async fn reviewer_workload(&self, user_id: &str) -> Result<Vec<PullRequestSummary>> {
        self.prs.list_by_reviewer(user_id).await
    }
}
