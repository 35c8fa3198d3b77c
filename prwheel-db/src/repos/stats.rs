//! Reviewer stats repository

use async_trait::async_trait;
use sqlx::SqlitePool;

use prwheel_core::{Result, ReviewerStat, StatsStore};

use crate::error::storage;

/// Repository for the derived reviewer-count aggregate
pub struct StatsRepo {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct StatRow {
    id: String,
    name: String,
    review_count: i64,
}

impl StatsRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StatsStore for StatsRepo {
    async fn top_reviewers(&self, limit: i64) -> Result<Vec<ReviewerStat>> {
        let rows = sqlx::query_as::<_, StatRow>(
            "SELECT u.id, u.name, COUNT(prr.pr_id) AS review_count
             FROM users u
             LEFT JOIN pr_reviewers prr ON u.id = prr.reviewer_id
             GROUP BY u.id, u.name
             ORDER BY review_count DESC, u.id
             LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;

        Ok(rows
            .into_iter()
            .map(|row| ReviewerStat {
                user_id: row.id,
                user_name: row.name,
                review_count: row.review_count,
            })
            .collect())
    }
}
