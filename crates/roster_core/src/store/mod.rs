//! Team persistence seams.
//!
//! The roster engine itself is pure; teams and rosters live behind
//! [`TeamStore`], player records behind [`PlayerDirectory`].
//!
//! Every roster write carries the version the caller last read. The store
//! re-checks that version and all roster preconditions against its own
//! state at commit time, so two clients working from the same snapshot can
//! never double-occupy a slot or double-place a player.

pub mod directory;
pub mod memory;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::RosterRules;
use crate::error::StoreError;
use crate::models::{PlayerPosition, RosterSlot, Team, TeamSettings, TeamSettingsUpdate};
use crate::roster::RosterAssignment;

pub use directory::{InMemoryPlayerDirectory, PlayerDirectory};
pub use memory::InMemoryTeamStore;

/// A team's roster as read at one version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterSnapshot {
    pub team_id: Uuid,
    pub version: u64,
    pub assignment: RosterAssignment,
}

pub trait TeamStore: Send + Sync {
    /// Rules every commit is validated against.
    fn rules(&self) -> &RosterRules;

    /// Validate `settings` and persist a new team with an empty roster.
    fn create_team(&self, settings: TeamSettings) -> Result<Team, StoreError>;

    fn fetch_team(&self, team_id: Uuid) -> Result<Team, StoreError>;

    fn fetch_roster(&self, team_id: Uuid) -> Result<RosterSnapshot, StoreError> {
        let team = self.fetch_team(team_id)?;
        Ok(RosterSnapshot { team_id, version: team.version, assignment: team.assignment })
    }

    fn list_teams(&self) -> Result<Vec<Team>, StoreError>;

    /// Apply a partial settings change. The roster layout is immutable.
    fn update_settings(
        &self,
        team_id: Uuid,
        update: &TeamSettingsUpdate,
        expected_version: u64,
    ) -> Result<Team, StoreError>;

    /// Delete the team and its roster.
    fn delete_team(&self, team_id: Uuid) -> Result<(), StoreError>;

    fn add_player(
        &self,
        team_id: Uuid,
        player_id: &str,
        slot: RosterSlot,
        position: PlayerPosition,
        expected_version: u64,
    ) -> Result<Team, StoreError>;

    fn remove_player(&self, team_id: Uuid, player_id: &str, expected_version: u64) -> Result<Team, StoreError>;

    fn move_player(
        &self,
        team_id: Uuid,
        player_id: &str,
        slot: RosterSlot,
        position: PlayerPosition,
        expected_version: u64,
    ) -> Result<Team, StoreError>;
}
