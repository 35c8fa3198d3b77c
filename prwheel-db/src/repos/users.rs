//! User directory repository

use async_trait::async_trait;
use sqlx::SqlitePool;

use prwheel_core::{Error, Result, ReviewerRepair, User, UserStore};

use crate::error::{is_unique_violation, storage};

/// Repository for the user directory
pub struct UserRepo {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    name: String,
    team_name: String,
    is_active: bool,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            name: row.name,
            team_name: row.team_name,
            is_active: row.is_active,
        }
    }
}

impl UserRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepo {
    async fn get_user(&self, id: &str) -> Result<User> {
        sqlx::query_as::<_, UserRow>(
            "SELECT id, name, team_name, is_active FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?
        .map(Into::into)
        .ok_or_else(|| Error::NotFound(format!("user {id}")))
    }

    async fn set_active(&self, id: &str, is_active: bool) -> Result<User> {
        let result = sqlx::query("UPDATE users SET is_active = ? WHERE id = ?")
            .bind(is_active)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(storage)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("user {id}")));
        }
        self.get_user(id).await
    }

    async fn active_members(&self, team_name: &str) -> Result<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, team_name, is_active
             FROM users
             WHERE team_name = ? AND is_active = TRUE
             ORDER BY id",
        )
        .bind(team_name)
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn bulk_deactivate(&self, ids: &[String], repairs: &[ReviewerRepair]) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(storage)?;

        for id in ids {
            sqlx::query("UPDATE users SET is_active = FALSE WHERE id = ?")
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(storage)?;
        }

        for repair in repairs {
            match repair {
                ReviewerRepair::Swap { pr_id, old, new } => {
                    let result = sqlx::query(
                        "UPDATE pr_reviewers SET reviewer_id = ?
                         WHERE pr_id = ? AND reviewer_id = ?
                           AND EXISTS (SELECT 1 FROM pull_requests WHERE id = ? AND status = 'OPEN')",
                    )
                    .bind(new)
                    .bind(pr_id)
                    .bind(old)
                    .bind(pr_id)
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| {
                        if is_unique_violation(&e) {
                            Error::Conflict(format!(
                                "reviewer {new} already on pull request {pr_id}"
                            ))
                        } else {
                            storage(e)
                        }
                    })?;

                    // The reviewer was swapped out, or the pull request
                    // merged, since the plan was computed; abort so the
                    // whole batch rolls back.
                    if result.rows_affected() == 0 {
                        return Err(Error::Conflict(format!(
                            "reviewer {old} no longer on open pull request {pr_id}"
                        )));
                    }
                }
                ReviewerRepair::Remove { pr_id, reviewer } => {
                    sqlx::query("DELETE FROM pr_reviewers WHERE pr_id = ? AND reviewer_id = ?")
                        .bind(pr_id)
                        .bind(reviewer)
                        .execute(&mut *tx)
                        .await
                        .map_err(storage)?;
                }
            }
        }

        tx.commit().await.map_err(storage)
    }
}
