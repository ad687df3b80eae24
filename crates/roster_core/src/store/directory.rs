use indexmap::IndexMap;

use crate::models::PlayerInfo;
use crate::roster::EligibilitySet;

/// Source of authoritative player records.
pub trait PlayerDirectory: Send + Sync {
    fn lookup(&self, player_id: &str) -> Option<PlayerInfo>;

    /// Players matching `query` (name, id or team) whose position is in
    /// `eligible`. An empty query matches everyone.
    fn search(&self, query: &str, eligible: &EligibilitySet) -> Vec<PlayerInfo>;
}

/// Directory backed by a map, kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPlayerDirectory {
    players: IndexMap<String, PlayerInfo>,
}

impl InMemoryPlayerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a player; returns the previous record.
    pub fn insert(&mut self, player: PlayerInfo) -> Option<PlayerInfo> {
        self.players.insert(player.player_id.clone(), player)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlayerInfo> {
        self.players.values()
    }
}

impl FromIterator<PlayerInfo> for InMemoryPlayerDirectory {
    fn from_iter<T: IntoIterator<Item = PlayerInfo>>(iter: T) -> Self {
        let mut directory = Self::new();
        for player in iter {
            directory.insert(player);
        }
        directory
    }
}

impl PlayerDirectory for InMemoryPlayerDirectory {
    fn lookup(&self, player_id: &str) -> Option<PlayerInfo> {
        self.players.get(player_id).cloned()
    }

    fn search(&self, query: &str, eligible: &EligibilitySet) -> Vec<PlayerInfo> {
        self.players
            .values()
            .filter(|player| eligible.contains(player.position) && player.matches_query(query))
            .cloned()
            .collect()
    }
}
