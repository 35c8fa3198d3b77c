//! Team roster management

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::models::Team;
use crate::store::TeamStore;

/// Creates teams and reads their rosters.
pub struct TeamService {
    teams: Arc<dyn TeamStore>,
}

impl TeamService {
    pub fn new(teams: Arc<dyn TeamStore>) -> Self {
        Self { teams }
    }

    /// Create a team and every listed member, all-or-nothing.
    pub async fn create(&self, team: Team) -> Result<Team> {
        info!(team_name = %team.name, "creating team");

        self.teams.create_team(&team).await.map_err(|e| {
            if matches!(e, Error::AlreadyExists(_)) {
                warn!(team_name = %team.name, "team already exists");
            }
            e
        })?;

        Ok(team)
    }

    /// Fetch a team with its member list.
    pub async fn get(&self, name: &str) -> Result<Team> {
        self.teams.get_team(name).await.map_err(|e| {
            if matches!(e, Error::NotFound(_)) {
                warn!(team_name = %name, "team not found");
            }
            e
        })
    }
}
