//! Team repository

use async_trait::async_trait;
use sqlx::SqlitePool;

use prwheel_core::{Error, Result, Team, TeamMember, TeamStore};

use crate::error::{is_unique_violation, storage};

/// Repository for teams and their denormalized member rows
pub struct TeamRepo {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct MemberRow {
    id: String,
    name: String,
    is_active: bool,
}

impl TeamRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TeamStore for TeamRepo {
    async fn create_team(&self, team: &Team) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(storage)?;

        sqlx::query("INSERT INTO teams (name) VALUES (?)")
            .bind(&team.name)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    Error::AlreadyExists(format!("team {}", team.name))
                } else {
                    storage(e)
                }
            })?;

        for member in &team.members {
            sqlx::query(
                "INSERT INTO users (id, name, team_name, is_active)
                 VALUES (?, ?, ?, ?)
                 ON CONFLICT (id) DO UPDATE
                 SET name = excluded.name,
                     team_name = excluded.team_name,
                     is_active = excluded.is_active",
            )
            .bind(&member.user_id)
            .bind(&member.user_name)
            .bind(&team.name)
            .bind(member.is_active)
            .execute(&mut *tx)
            .await
            .map_err(storage)?;
        }

        tx.commit().await.map_err(storage)
    }

    async fn get_team(&self, name: &str) -> Result<Team> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM teams WHERE name = ?)")
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(storage)?;

        if !exists {
            return Err(Error::NotFound(format!("team {name}")));
        }

        let rows = sqlx::query_as::<_, MemberRow>(
            "SELECT id, name, is_active FROM users WHERE team_name = ? ORDER BY id",
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;

        Ok(Team {
            name: name.to_string(),
            members: rows
                .into_iter()
                .map(|row| TeamMember {
                    user_id: row.id,
                    user_name: row.name,
                    is_active: row.is_active,
                })
                .collect(),
        })
    }
}
