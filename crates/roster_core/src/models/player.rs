use serde::{Deserialize, Serialize};

use super::position::PlayerPosition;

/// Player record as supplied by the player directory.
///
/// The position is authoritative input: the roster engine never derives it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub player_id: String,
    pub name: String,
    /// NFL team abbreviation, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    pub position: PlayerPosition,
}

impl PlayerInfo {
    pub fn new(player_id: impl Into<String>, name: impl Into<String>, position: PlayerPosition) -> Self {
        Self { player_id: player_id.into(), name: name.into(), team: None, position }
    }

    pub fn with_team(mut self, team: impl Into<String>) -> Self {
        self.team = Some(team.into());
        self
    }

    /// Case-insensitive match on name, id or team.
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&query)
            || self.player_id.to_lowercase().contains(&query)
            || self.team.as_deref().map(|t| t.to_lowercase() == query).unwrap_or(false)
    }
}
