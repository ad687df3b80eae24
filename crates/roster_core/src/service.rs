//! Roster request flow: read the team, look up the player, validate, commit
//! against the version that was read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::{RosterError, ServiceError};
use crate::models::{PlayerInfo, RosterSlot, Team, TeamSettings};
use crate::roster::{EligibilityResolver, LineupOrderer, LineupRow, SlotAllocator};
use crate::store::{PlayerDirectory, TeamStore};

/// A rostered player with its directory record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterPlayer {
    pub player_id: String,
    pub roster_slot: RosterSlot,
    pub added_at: DateTime<Utc>,
    /// `None` when the directory no longer knows the player.
    pub info: Option<PlayerInfo>,
}

/// Everything the display layer needs to render one team's roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterView {
    pub team_id: Uuid,
    pub team_name: String,
    pub version: u64,
    pub starters: Vec<LineupRow>,
    pub bench: Vec<LineupRow>,
    pub ir: Vec<LineupRow>,
    pub available_slots: Vec<RosterSlot>,
    pub players: Vec<RosterPlayer>,
}

pub struct RosterService<S, D> {
    store: S,
    directory: D,
    resolver: EligibilityResolver,
    orderer: LineupOrderer,
}

impl<S: TeamStore, D: PlayerDirectory> RosterService<S, D> {
    /// Eligibility and lineup ordering follow the store's rules, so the
    /// slots offered here are the ones the store will accept.
    pub fn new(store: S, directory: D) -> Self {
        let rules = store.rules();
        let resolver = EligibilityResolver::new(rules);
        let orderer = LineupOrderer::new(&rules.lineup);
        Self { store, directory, resolver, orderer }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn create_team(&self, settings: TeamSettings) -> Result<Team, ServiceError> {
        Ok(self.store.create_team(settings)?)
    }

    pub fn roster_view(&self, team_id: Uuid) -> Result<RosterView, ServiceError> {
        let team = self.store.fetch_team(team_id)?;
        Ok(self.view(&team))
    }

    /// Open slots the player could be placed into, in slot order.
    pub fn available_slots_for_player(&self, team_id: Uuid, player_id: &str) -> Result<Vec<RosterSlot>, ServiceError> {
        let player = self.player(player_id)?;
        let team = self.store.fetch_team(team_id)?;
        Ok(SlotAllocator::available_slots_for(team.config(), &team.assignment, &self.resolver, player.position))
    }

    /// Directory search restricted to the positions `slot` accepts.
    pub fn search_players_for_slot(
        &self,
        team_id: Uuid,
        slot: &RosterSlot,
        query: &str,
    ) -> Result<Vec<PlayerInfo>, ServiceError> {
        let team = self.store.fetch_team(team_id)?;
        if !team.config().contains(slot) {
            return Err(RosterError::SlotNotFound { slot: slot.clone() }.into());
        }

        let eligible = self.resolver.eligible_positions(slot);
        Ok(self
            .directory
            .search(query, &eligible)
            .into_iter()
            .filter(|player| !team.assignment.contains_player(&player.player_id))
            .collect())
    }

    /// Place a player. Without `expected_version` the version read here is
    /// used, so a concurrent write in between still fails the commit.
    pub fn add_player(
        &self,
        team_id: Uuid,
        player_id: &str,
        slot: RosterSlot,
        expected_version: Option<u64>,
    ) -> Result<RosterView, ServiceError> {
        let player = self.player(player_id)?;
        let version = self.version(team_id, expected_version)?;

        let team = self.store.add_player(team_id, player_id, slot, player.position, version)?;
        Ok(self.view(&team))
    }

    pub fn move_player(
        &self,
        team_id: Uuid,
        player_id: &str,
        slot: RosterSlot,
        expected_version: Option<u64>,
    ) -> Result<RosterView, ServiceError> {
        let player = self.player(player_id)?;
        let version = self.version(team_id, expected_version)?;

        let team = self.store.move_player(team_id, player_id, slot, player.position, version)?;
        Ok(self.view(&team))
    }

    pub fn remove_player(
        &self,
        team_id: Uuid,
        player_id: &str,
        expected_version: Option<u64>,
    ) -> Result<RosterView, ServiceError> {
        let version = self.version(team_id, expected_version)?;
        let team = self.store.remove_player(team_id, player_id, version)?;
        Ok(self.view(&team))
    }

    fn player(&self, player_id: &str) -> Result<PlayerInfo, ServiceError> {
        self.directory
            .lookup(player_id)
            .ok_or_else(|| ServiceError::PlayerNotFound { player_id: player_id.to_string() })
    }

    fn version(&self, team_id: Uuid, expected_version: Option<u64>) -> Result<u64, ServiceError> {
        match expected_version {
            Some(version) => Ok(version),
            None => Ok(self.store.fetch_roster(team_id)?.version),
        }
    }

    fn view(&self, team: &Team) -> RosterView {
        let config = team.config();
        let assignment = &team.assignment;

        let players = assignment
            .entries()
            .into_iter()
            .map(|entry| {
                let info = self.directory.lookup(&entry.player_id);
                if info.is_none() {
                    debug!(team_id = %team.id, player_id = %entry.player_id, "rostered player missing from directory");
                }
                RosterPlayer {
                    player_id: entry.player_id,
                    roster_slot: entry.roster_slot,
                    added_at: entry.added_at,
                    info,
                }
            })
            .collect();

        debug!(team_id = %team.id, version = team.version, players = assignment.len(), "built roster view");
        RosterView {
            team_id: team.id,
            team_name: team.settings.name.clone(),
            version: team.version,
            starters: self.orderer.ordered_starter_slots(config, assignment),
            bench: self.orderer.bench_rows(config, assignment),
            ir: self.orderer.ir_rows(config, assignment),
            available_slots: SlotAllocator::available_slots(config, assignment),
            players,
        }
    }
}
