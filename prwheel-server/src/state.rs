//! Shared handler state

use std::sync::Arc;

use prwheel_core::{
    Picker, PrStore, PullRequestService, StatsService, StatsStore, TeamService, TeamStore,
    UserService, UserStore,
};
use prwheel_db::Database;

/// Services shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    pub pull_requests: Arc<PullRequestService>,
    pub users: Arc<UserService>,
    pub teams: Arc<TeamService>,
    pub stats: Arc<StatsService>,
}

impl AppState {
    /// Wire the services over arbitrary store implementations.
    pub fn new(
        user_store: Arc<dyn UserStore>,
        team_store: Arc<dyn TeamStore>,
        pr_store: Arc<dyn PrStore>,
        stats_store: Arc<dyn StatsStore>,
        picker: Arc<Picker>,
    ) -> Self {
        Self {
            pull_requests: Arc::new(PullRequestService::new(
                pr_store.clone(),
                user_store.clone(),
                picker,
            )),
            users: Arc::new(UserService::new(user_store, pr_store)),
            teams: Arc::new(TeamService::new(team_store)),
            stats: Arc::new(StatsService::new(stats_store)),
        }
    }

    /// Wire the services over the SQLite database.
    pub fn from_database(db: &Database) -> Self {
        Self::new(
            Arc::new(db.users()),
            Arc::new(db.teams()),
            Arc::new(db.pull_requests()),
            Arc::new(db.stats()),
            Arc::new(Picker::from_entropy()),
        )
    }
}
