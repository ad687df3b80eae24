use std::collections::HashMap;
use std::sync::RwLock;

use tracing::{info, warn};
use uuid::Uuid;

use super::TeamStore;
use crate::config::RosterRules;
use crate::error::StoreError;
use crate::models::{PlayerPosition, RosterSlot, Team, TeamSettings, TeamSettingsUpdate};
use crate::roster::EligibilityResolver;

/// Process-local [`TeamStore`]; one write lock covers a whole
/// read-validate-commit cycle.
#[derive(Debug)]
pub struct InMemoryTeamStore {
    teams: RwLock<HashMap<Uuid, Team>>,
    rules: RosterRules,
    resolver: EligibilityResolver,
}

impl InMemoryTeamStore {
    pub fn new(rules: RosterRules) -> Self {
        let resolver = EligibilityResolver::new(&rules);
        Self { teams: RwLock::new(HashMap::new()), rules, resolver }
    }

    /// Store an already-built team as-is (e.g. one loaded from disk).
    pub fn insert_team(&self, team: Team) {
        self.teams.write().expect("team store lock poisoned").insert(team.id, team);
    }

    pub fn len(&self) -> usize {
        self.teams.read().expect("team store lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run `change` against the team under the write lock, provided the
    /// team is still at `expected_version`. `change` must leave the team
    /// untouched when it fails.
    fn commit<F>(&self, team_id: Uuid, expected_version: u64, change: F) -> Result<Team, StoreError>
    where
        F: FnOnce(&mut Team, &EligibilityResolver) -> Result<(), StoreError>,
    {
        let mut teams = self.teams.write().expect("team store lock poisoned");
        let team = teams.get_mut(&team_id).ok_or(StoreError::TeamNotFound { team_id })?;

        if team.version != expected_version {
            warn!(%team_id, expected_version, found = team.version, "stale roster write rejected");
            return Err(StoreError::VersionConflict {
                team_id,
                expected: expected_version,
                found: team.version,
            });
        }

        if let Err(err) = change(team, &self.resolver) {
            warn!(%team_id, code = err.code(), "roster change rejected: {}", err);
            return Err(err);
        }

        team.touch();
        Ok(team.clone())
    }
}

impl Default for InMemoryTeamStore {
    fn default() -> Self {
        Self::new(RosterRules::standard())
    }
}

impl TeamStore for InMemoryTeamStore {
    fn rules(&self) -> &RosterRules {
        &self.rules
    }

    fn create_team(&self, settings: TeamSettings) -> Result<Team, StoreError> {
        settings.validate(&self.rules)?;

        let team = Team::new(settings);
        info!(team_id = %team.id, name = %team.settings.name, "created team");
        self.insert_team(team.clone());
        Ok(team)
    }

    fn fetch_team(&self, team_id: Uuid) -> Result<Team, StoreError> {
        self.teams
            .read()
            .expect("team store lock poisoned")
            .get(&team_id)
            .cloned()
            .ok_or(StoreError::TeamNotFound { team_id })
    }

    fn list_teams(&self) -> Result<Vec<Team>, StoreError> {
        let mut teams: Vec<Team> = self.teams.read().expect("team store lock poisoned").values().cloned().collect();
        teams.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(teams)
    }

    fn update_settings(
        &self,
        team_id: Uuid,
        update: &TeamSettingsUpdate,
        expected_version: u64,
    ) -> Result<Team, StoreError> {
        let rules = &self.rules;
        self.commit(team_id, expected_version, |team, _| {
            let mut settings = team.settings.clone();
            settings.apply(update);
            settings.validate(rules)?;
            team.settings = settings;
            Ok(())
        })
    }

    fn delete_team(&self, team_id: Uuid) -> Result<(), StoreError> {
        let removed = self.teams.write().expect("team store lock poisoned").remove(&team_id);
        match removed {
            Some(team) => {
                info!(%team_id, players = team.assignment.len(), "deleted team");
                Ok(())
            }
            None => Err(StoreError::TeamNotFound { team_id }),
        }
    }

    fn add_player(
        &self,
        team_id: Uuid,
        player_id: &str,
        slot: RosterSlot,
        position: PlayerPosition,
        expected_version: u64,
    ) -> Result<Team, StoreError> {
        let label = slot.to_string();
        let team = self.commit(team_id, expected_version, |team, resolver| {
            team.assignment.add(&team.settings.roster_positions, resolver, slot, player_id, position)?;
            Ok(())
        })?;
        info!(%team_id, player_id, slot = %label, version = team.version, "added player to roster");
        Ok(team)
    }

    fn remove_player(&self, team_id: Uuid, player_id: &str, expected_version: u64) -> Result<Team, StoreError> {
        let team = self.commit(team_id, expected_version, |team, _| {
            team.assignment.remove(player_id)?;
            Ok(())
        })?;
        info!(%team_id, player_id, version = team.version, "removed player from roster");
        Ok(team)
    }

    fn move_player(
        &self,
        team_id: Uuid,
        player_id: &str,
        slot: RosterSlot,
        position: PlayerPosition,
        expected_version: u64,
    ) -> Result<Team, StoreError> {
        let label = slot.to_string();
        let team = self.commit(team_id, expected_version, |team, resolver| {
            team.assignment.move_player(&team.settings.roster_positions, resolver, player_id, slot, position)?;
            Ok(())
        })?;
        info!(%team_id, player_id, slot = %label, version = team.version, "moved player");
        Ok(team)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UnknownSlotPolicy;
    use crate::error::RosterError;
    use crate::models::RosterConfiguration;
    use std::sync::Arc;
    use std::thread;
    use PlayerPosition::*;

    fn store_with_team() -> (InMemoryTeamStore, Team) {
        let store = InMemoryTeamStore::default();
        let team = store.create_team(TeamSettings::new("Test Team")).unwrap();
        (store, team)
    }

    #[test]
    fn test_create_validates_settings() {
        let store = InMemoryTeamStore::default();
        let mut settings = TeamSettings::new("Tiny league");
        settings.league_size = 2;
        let err = store.create_team(settings).unwrap_err();
        assert_eq!(err.code(), "INVALID_LEAGUE_SIZE");
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_bumps_version() {
        let (store, team) = store_with_team();
        assert_eq!(team.version, 0);

        let team = store.add_player(team.id, "p-qb", RosterSlot::starter("QB", 1), QB, 0).unwrap();
        assert_eq!(team.version, 1);
        assert_eq!(team.assignment.get(&RosterSlot::starter("QB", 1)), Some("p-qb"));

        let snapshot = store.fetch_roster(team.id).unwrap();
        assert_eq!(snapshot.version, 1);
        assert_eq!(snapshot.assignment, team.assignment);
    }

    #[test]
    fn test_stale_version_is_rejected() {
        let (store, team) = store_with_team();
        store.add_player(team.id, "p-rb", RosterSlot::starter("RB", 1), RB, 0).unwrap();

        // Second client still holds version 0
        let err = store.add_player(team.id, "p-wr", RosterSlot::starter("WR", 1), WR, 0).unwrap_err();
        assert!(matches!(err, StoreError::VersionConflict { expected: 0, found: 1, .. }));

        let current = store.fetch_team(team.id).unwrap();
        assert_eq!(current.version, 1);
        assert!(!current.assignment.contains_player("p-wr"));
    }

    #[test]
    fn test_rejected_change_keeps_version() {
        let (store, team) = store_with_team();
        let err = store.add_player(team.id, "p-rb", RosterSlot::starter("WR", 1), RB, 0).unwrap_err();
        assert!(matches!(err, StoreError::Roster(RosterError::PositionIneligible { .. })));
        assert_eq!(store.fetch_team(team.id).unwrap().version, 0);
    }

    #[test]
    fn test_strict_store_rejects_unknown_label() {
        let rules = RosterRules::standard().with_unknown_slot_policy(UnknownSlotPolicy::Strict);
        let store = InMemoryTeamStore::new(rules);
        let config = RosterConfiguration::new([("QB", 1), ("OP", 1)], 2, 0).unwrap();
        // Team creation would refuse OP, so place the team directly
        let team = Team::new(TeamSettings::new("Loaded").with_roster_positions(config));
        let team_id = team.id;
        store.insert_team(team);

        let err = store.add_player(team_id, "p-qb", RosterSlot::starter("OP", 1), QB, 0).unwrap_err();
        assert_eq!(err.code(), "UNKNOWN_SLOT_TYPE");
        let err = store.add_player(team_id, "p-qb", RosterSlot::starter("OP", 2), QB, 0).unwrap_err();
        assert_eq!(err.code(), "SLOT_NOT_FOUND");
        assert_eq!(store.fetch_team(team_id).unwrap().version, 0);
    }

    #[test]
    fn test_move_and_remove() {
        let (store, team) = store_with_team();
        let team = store.add_player(team.id, "p-te", RosterSlot::bench(1), TE, 0).unwrap();
        let team = store.move_player(team.id, "p-te", RosterSlot::starter("FLEX", 1), TE, team.version).unwrap();
        assert_eq!(team.assignment.slot_of("p-te"), Some(&RosterSlot::starter("FLEX", 1)));

        let team = store.remove_player(team.id, "p-te", team.version).unwrap();
        assert!(team.assignment.is_empty());
        assert_eq!(team.version, 3);

        let err = store.remove_player(team.id, "p-te", team.version).unwrap_err();
        assert_eq!(err.code(), "PLAYER_NOT_ROSTERED");
    }

    #[test]
    fn test_update_settings_and_delete() {
        let (store, team) = store_with_team();
        let update = TeamSettingsUpdate { league_size: Some(40), ..Default::default() };
        let err = store.update_settings(team.id, &update, 0).unwrap_err();
        assert_eq!(err.code(), "INVALID_LEAGUE_SIZE");

        let update = TeamSettingsUpdate { name: Some("Renamed".to_string()), ..Default::default() };
        let team = store.update_settings(team.id, &update, 0).unwrap();
        assert_eq!(team.settings.name, "Renamed");
        assert_eq!(team.version, 1);
        assert_eq!(store.list_teams().unwrap().len(), 1);

        store.delete_team(team.id).unwrap();
        assert!(matches!(store.fetch_team(team.id), Err(StoreError::TeamNotFound { .. })));
        assert!(store.delete_team(team.id).is_err());
    }

    #[test]
    fn test_concurrent_writers_cannot_double_occupy() {
        let (store, team) = store_with_team();
        let store = Arc::new(store);
        let team_id = team.id;

        let handles: Vec<_> = (0..8)
            .map(|n| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    store
                        .add_player(team_id, &format!("p{}", n), RosterSlot::starter("FLEX", 1), WR, 0)
                        .is_ok()
                })
            })
            .collect();

        let wins = handles.into_iter().map(|h| h.join().unwrap()).filter(|ok| *ok).count();
        assert_eq!(wins, 1);

        let team = store.fetch_team(team_id).unwrap();
        assert_eq!(team.version, 1);
        assert_eq!(team.assignment.len(), 1);
    }
}
