//! Pull request repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use prwheel_core::{Error, PrStatus, PrStore, PullRequest, PullRequestSummary, Result};

use crate::error::{is_unique_violation, storage};

/// Repository for pull requests and their reviewer junction rows
pub struct PrRepo {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct PrRow {
    id: String,
    name: String,
    author_id: String,
    status: String,
    created_at: DateTime<Utc>,
    merged_at: Option<DateTime<Utc>>,
}

impl PrRow {
    fn into_pr(self, reviewers: Vec<String>) -> Result<PullRequest> {
        let status: PrStatus = self.status.parse().map_err(Error::Storage)?;
        Ok(PullRequest {
            id: self.id,
            name: self.name,
            author_id: self.author_id,
            status,
            created_at: self.created_at,
            merged_at: self.merged_at,
            reviewers,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SummaryRow {
    id: String,
    name: String,
    author_id: String,
    status: String,
}

impl PrRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn reviewers_of(&self, pr_id: &str) -> Result<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            "SELECT reviewer_id FROM pr_reviewers WHERE pr_id = ? ORDER BY rowid",
        )
        .bind(pr_id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage)
    }
}

#[async_trait]
impl PrStore for PrRepo {
    async fn create(&self, pr: &PullRequest) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(storage)?;

        sqlx::query(
            "INSERT INTO pull_requests (id, name, author_id, status, created_at, merged_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&pr.id)
        .bind(&pr.name)
        .bind(&pr.author_id)
        .bind(pr.status.as_str())
        .bind(pr.created_at)
        .bind(pr.merged_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                Error::AlreadyExists(format!("pull request {}", pr.id))
            } else {
                storage(e)
            }
        })?;

        for reviewer in &pr.reviewers {
            sqlx::query("INSERT INTO pr_reviewers (pr_id, reviewer_id) VALUES (?, ?)")
                .bind(&pr.id)
                .bind(reviewer)
                .execute(&mut *tx)
                .await
                .map_err(storage)?;
        }

        tx.commit().await.map_err(storage)
    }

    async fn get(&self, id: &str) -> Result<PullRequest> {
        let row = sqlx::query_as::<_, PrRow>(
            "SELECT id, name, author_id, status, created_at, merged_at
             FROM pull_requests
             WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?
        .ok_or_else(|| Error::NotFound(format!("pull request {id}")))?;

        let reviewers = self.reviewers_of(id).await?;
        row.into_pr(reviewers)
    }

    async fn merge(&self, id: &str) -> Result<PullRequest> {
        // Guarded on status so a second merge leaves the original
        // merged_at untouched.
        sqlx::query(
            "UPDATE pull_requests SET status = 'MERGED', merged_at = ?
             WHERE id = ? AND status = 'OPEN'",
        )
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(storage)?;

        self.get(id).await
    }

    async fn swap_reviewer(&self, pr_id: &str, old: &str, new: &str) -> Result<()> {
        // The status guard lives in the same statement as the reviewer
        // guard so a merge racing this swap cannot mutate a merged set.
        let result = sqlx::query(
            "UPDATE pr_reviewers SET reviewer_id = ?
             WHERE pr_id = ? AND reviewer_id = ?
               AND EXISTS (SELECT 1 FROM pull_requests WHERE id = ? AND status = 'OPEN')",
        )
        .bind(new)
        .bind(pr_id)
        .bind(old)
        .bind(pr_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                Error::Conflict(format!("reviewer {new} already on pull request {pr_id}"))
            } else {
                storage(e)
            }
        })?;

        if result.rows_affected() == 0 {
            let merged: bool = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM pull_requests WHERE id = ? AND status = 'MERGED')",
            )
            .bind(pr_id)
            .fetch_one(&self.pool)
            .await
            .map_err(storage)?;
            if merged {
                return Err(Error::PrMerged(pr_id.to_string()));
            }
            return Err(Error::NotAssigned {
                pr: pr_id.to_string(),
                user: old.to_string(),
            });
        }
        Ok(())
    }

    async fn remove_reviewer(&self, pr_id: &str, reviewer: &str) -> Result<()> {
        sqlx::query("DELETE FROM pr_reviewers WHERE pr_id = ? AND reviewer_id = ?")
            .bind(pr_id)
            .bind(reviewer)
            .execute(&self.pool)
            .await
            .map_err(storage)?;
        Ok(())
    }

    async fn list_by_reviewer(&self, user_id: &str) -> Result<Vec<PullRequestSummary>> {
        let rows = sqlx::query_as::<_, SummaryRow>(
            "SELECT pr.id, pr.name, pr.author_id, pr.status
             FROM pull_requests pr
             INNER JOIN pr_reviewers prr ON pr.id = prr.pr_id
             WHERE prr.reviewer_id = ?
             ORDER BY pr.created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;

        rows.into_iter()
            .map(|row| {
                let status: PrStatus = row.status.parse().map_err(Error::Storage)?;
                Ok(PullRequestSummary {
                    id: row.id,
                    name: row.name,
                    author_id: row.author_id,
                    status,
                })
            })
            .collect()
    }
}
