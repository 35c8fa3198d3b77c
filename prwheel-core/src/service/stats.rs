//! Reviewer statistics

use std::sync::Arc;

use tracing::error;

use crate::error::Result;
use crate::models::ReviewerStat;
use crate::store::StatsStore;

/// How many reviewers the leaderboard shows
const TOP_REVIEWERS_LIMIT: i64 = 10;

/// Read-only reviewer aggregates.
pub struct StatsService {
    stats: Arc<dyn StatsStore>,
}

impl StatsService {
    pub fn new(stats: Arc<dyn StatsStore>) -> Self {
        Self { stats }
    }

    /// Top reviewers by total review assignments, descending.
    pub async fn top_reviewers(&self) -> Result<Vec<ReviewerStat>> {
        self.stats
            .top_reviewers(TOP_REVIEWERS_LIMIT)
            .await
            .map_err(|e| {
                error!(err = %e, "failed to read reviewer stats");
                e
            })
    }
}
