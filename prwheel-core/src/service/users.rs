//! User activation and the deactivation cascade

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::models::{PrStatus, PullRequest, User};
use crate::service::candidates::candidate_pool;
use crate::store::{PrStore, ReviewerRepair, UserStore};

/// Flips active flags and repairs the open reviewer assignments a
/// departing user leaves behind.
pub struct UserService {
    users: Arc<dyn UserStore>,
    prs: Arc<dyn PrStore>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserStore>, prs: Arc<dyn PrStore>) -> Self {
        Self { users, prs }
    }

    /// Set a user's active flag.
    ///
    /// Activation only touches the flag. Deactivation is the single-user
    /// form of [`UserService::deactivate`], so every open pull request the
    /// user reviews gets repaired in the same atomic unit.
    pub async fn set_active(&self, user_id: &str, is_active: bool) -> Result<User> {
        info!(user_id = %user_id, is_active, "setting user active flag");

        if is_active {
            return self.users.set_active(user_id, true).await.map_err(|e| {
                if matches!(e, Error::NotFound(_)) {
                    warn!(user_id = %user_id, "user not found");
                }
                e
            });
        }

        let mut user = self.users.get_user(user_id).await.map_err(|e| {
            if matches!(e, Error::NotFound(_)) {
                warn!(user_id = %user_id, "user not found");
            }
            e
        })?;

        self.deactivate(std::slice::from_ref(&user.id)).await?;
        user.is_active = false;
        Ok(user)
    }

    /// Deactivate a batch of users and cascade over their open reviews.
    ///
    /// For every open pull request a listed user reviews, the departing
    /// reviewer is swapped for an eligible teammate where one exists and
    /// dropped otherwise. Replacement is deterministic: the smallest
    /// eligible user id. Users being deactivated in the same batch are
    /// never eligible, and repairs observe the reviewer sets as already
    /// repaired by earlier steps of the batch. Flag flips and repairs
    /// commit as one atomic unit.
    pub async fn deactivate(&self, user_ids: &[String]) -> Result<()> {
        info!(user_ids = ?user_ids, "deactivating users");

        let repairs = self.plan_cascade(user_ids).await?;
        if !repairs.is_empty() {
            info!(count = repairs.len(), "repairing open review assignments");
        }

        self.users.bulk_deactivate(user_ids, &repairs).await
    }

    /// Compute the repair list for a deactivation batch. Pure read phase;
    /// nothing is written here.
    async fn plan_cascade(&self, user_ids: &[String]) -> Result<Vec<ReviewerRepair>> {
        // Local view of every affected pull request, mutated as repairs
        // accumulate so later steps of the batch see earlier repairs.
        let mut affected: HashMap<String, PullRequest> = HashMap::new();
        let mut team_of_author: HashMap<String, String> = HashMap::new();
        let mut members_of_team: HashMap<String, Vec<User>> = HashMap::new();
        let mut repairs = Vec::new();

        for departing in user_ids {
            let summaries = self.prs.list_by_reviewer(departing).await?;
            for summary in summaries {
                if summary.status != PrStatus::Open {
                    // Merged history keeps its reviewer list as-is.
                    continue;
                }

                if !affected.contains_key(&summary.id) {
                    let pr = self.prs.get(&summary.id).await?;
                    affected.insert(summary.id.clone(), pr);
                }

                let author_id = affected[&summary.id].author_id.clone();
                let team = match team_of_author.get(&author_id) {
                    Some(team) => team.clone(),
                    None => {
                        let author = self.users.get_user(&author_id).await?;
                        team_of_author.insert(author_id.clone(), author.team_name.clone());
                        author.team_name
                    }
                };
                let members = match members_of_team.get(&team) {
                    Some(members) => members.clone(),
                    None => {
                        let members = self.users.active_members(&team).await?;
                        members_of_team.insert(team.clone(), members.clone());
                        members
                    }
                };

                let Some(pr) = affected.get_mut(&summary.id) else {
                    continue;
                };
                if !pr.has_reviewer(departing) {
                    continue;
                }

                let replacement = {
                    let mut exclude: HashSet<&str> = HashSet::new();
                    exclude.insert(pr.author_id.as_str());
                    for reviewer in &pr.reviewers {
                        exclude.insert(reviewer.as_str());
                    }
                    for id in user_ids {
                        exclude.insert(id.as_str());
                    }
                    let mut pool = candidate_pool(&members, &exclude);
                    pool.sort();
                    pool.into_iter().next()
                };

                match replacement {
                    Some(new_reviewer) => {
                        if let Some(slot) = pr.reviewers.iter_mut().find(|r| *r == departing) {
                            *slot = new_reviewer.clone();
                        }
                        repairs.push(ReviewerRepair::Swap {
                            pr_id: pr.id.clone(),
                            old: departing.clone(),
                            new: new_reviewer,
                        });
                    }
                    None => {
                        pr.reviewers.retain(|r| r != departing);
                        repairs.push(ReviewerRepair::Remove {
                            pr_id: pr.id.clone(),
                            reviewer: departing.clone(),
                        });
                    }
                }
            }
        }

        Ok(repairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use crate::models::PullRequest;
    use chrono::Utc;

    fn service(store: &MemoryStore) -> UserService {
        UserService::new(Arc::new(store.clone()), Arc::new(store.clone()))
    }

    fn seed_team(store: &MemoryStore, team: &str, ids: &[&str]) {
        for id in ids {
            store.insert_user(User {
                id: id.to_string(),
                name: id.to_uppercase(),
                team_name: team.to_string(),
                is_active: true,
            });
        }
    }

    fn open_pr(id: &str, author: &str, reviewers: &[&str]) -> PullRequest {
        PullRequest {
            id: id.into(),
            name: format!("{id} title"),
            author_id: author.into(),
            status: PrStatus::Open,
            created_at: Utc::now(),
            merged_at: None,
            reviewers: reviewers.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn deactivation_replaces_reviewer_with_smallest_eligible_id() {
        let store = MemoryStore::new();
        seed_team(&store, "backend", &["u1", "u2", "u3", "u4", "u5"]);
        store.insert_pr(open_pr("pr-1", "u1", &["u2", "u3"]));
        let svc = service(&store);

        svc.deactivate(&["u2".into()]).await.unwrap();

        assert!(!store.user("u2").unwrap().is_active);
        // Eligible pool is {u4, u5}; deterministic pick is u4.
        assert_eq!(store.pr("pr-1").unwrap().reviewers, vec!["u4", "u3"]);
    }

    #[tokio::test]
    async fn deactivation_drops_reviewer_when_no_candidate_exists() {
        let store = MemoryStore::new();
        seed_team(&store, "backend", &["u1", "u2"]);
        store.insert_pr(open_pr("pr-1", "u1", &["u2"]));
        let svc = service(&store);

        svc.deactivate(&["u2".into()]).await.unwrap();

        assert!(!store.user("u2").unwrap().is_active);
        assert!(store.pr("pr-1").unwrap().reviewers.is_empty());
    }

    #[tokio::test]
    async fn deactivation_leaves_merged_prs_untouched() {
        let store = MemoryStore::new();
        seed_team(&store, "backend", &["u1", "u2", "u3", "u4"]);
        let mut pr = open_pr("pr-1", "u1", &["u2", "u3"]);
        pr.status = PrStatus::Merged;
        pr.merged_at = Some(Utc::now());
        store.insert_pr(pr);
        let svc = service(&store);

        svc.deactivate(&["u2".into()]).await.unwrap();

        // Stale inactive reviewer stays recorded for history.
        assert!(!store.user("u2").unwrap().is_active);
        assert_eq!(store.pr("pr-1").unwrap().reviewers, vec!["u2", "u3"]);
    }

    #[tokio::test]
    async fn batch_members_are_never_picked_as_replacements() {
        let store = MemoryStore::new();
        seed_team(&store, "backend", &["u1", "u2", "u3", "u4", "u5"]);
        store.insert_pr(open_pr("pr-1", "u1", &["u2", "u3"]));
        let svc = service(&store);

        // u4 would be the smallest eligible id, but it is going inactive
        // in the same batch.
        svc.deactivate(&["u2".into(), "u4".into()]).await.unwrap();

        assert_eq!(store.pr("pr-1").unwrap().reviewers, vec!["u5", "u3"]);
    }

    #[tokio::test]
    async fn both_reviewers_in_one_batch_are_repaired_consistently() {
        let store = MemoryStore::new();
        seed_team(&store, "backend", &["u1", "u2", "u3", "u4", "u5"]);
        store.insert_pr(open_pr("pr-1", "u1", &["u2", "u3"]));
        let svc = service(&store);

        svc.deactivate(&["u2".into(), "u3".into()]).await.unwrap();

        let reviewers = store.pr("pr-1").unwrap().reviewers;
        // u2 -> u4 (smallest eligible), then u3 -> u5 because the first
        // repair already claimed u4.
        assert_eq!(reviewers, vec!["u4", "u5"]);
    }

    #[tokio::test]
    async fn deactivating_user_with_no_reviews_only_flips_the_flag() {
        let store = MemoryStore::new();
        seed_team(&store, "backend", &["u1", "u2", "u3"]);
        store.insert_pr(open_pr("pr-1", "u1", &["u2"]));
        let svc = service(&store);

        svc.deactivate(&["u3".into()]).await.unwrap();

        assert!(!store.user("u3").unwrap().is_active);
        assert_eq!(store.pr("pr-1").unwrap().reviewers, vec!["u2"]);
    }

    #[tokio::test]
    async fn deactivation_spans_prs_across_teams() {
        let store = MemoryStore::new();
        seed_team(&store, "backend", &["u1", "u2", "u3"]);
        seed_team(&store, "frontend", &["f1", "f2"]);
        // u2 reviews in its own team; f2 reviews for frontend.
        store.insert_pr(open_pr("pr-1", "u1", &["u2"]));
        store.insert_pr(open_pr("pr-2", "f1", &["f2"]));
        let svc = service(&store);

        svc.deactivate(&["u2".into(), "f2".into()]).await.unwrap();

        assert_eq!(store.pr("pr-1").unwrap().reviewers, vec!["u3"]);
        // Frontend has nobody left; the slot empties.
        assert!(store.pr("pr-2").unwrap().reviewers.is_empty());
    }

    #[tokio::test]
    async fn set_active_true_touches_only_the_flag() {
        let store = MemoryStore::new();
        seed_team(&store, "backend", &["u1"]);
        store.insert_user(User {
            id: "u1".into(),
            name: "U1".into(),
            team_name: "backend".into(),
            is_active: false,
        });
        let svc = service(&store);

        let user = svc.set_active("u1", true).await.unwrap();
        assert!(user.is_active);
        assert!(store.user("u1").unwrap().is_active);
    }

    #[tokio::test]
    async fn set_active_false_cascades() {
        let store = MemoryStore::new();
        seed_team(&store, "backend", &["u1", "u2", "u3"]);
        store.insert_pr(open_pr("pr-1", "u1", &["u2"]));
        let svc = service(&store);

        let user = svc.set_active("u2", false).await.unwrap();
        assert!(!user.is_active);
        assert_eq!(store.pr("pr-1").unwrap().reviewers, vec!["u3"]);
    }

    #[tokio::test]
    async fn set_active_unknown_user_fails_with_not_found() {
        let store = MemoryStore::new();
        let svc = service(&store);
        let err = svc.set_active("ghost", false).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        let err = svc.set_active("ghost", true).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
