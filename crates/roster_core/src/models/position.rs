use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PositionParseError;

/// Position a player is listed at by the player directory.
///
/// Parsing is case-insensitive; `DEF` is accepted as an alias of `DST`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PlayerPosition {
    QB,
    RB,
    WR,
    TE,
    K,
    DST,
}

impl PlayerPosition {
    /// Every position a player can be listed at, in display order.
    pub const ALL: [PlayerPosition; 6] = [
        PlayerPosition::QB,
        PlayerPosition::RB,
        PlayerPosition::WR,
        PlayerPosition::TE,
        PlayerPosition::K,
        PlayerPosition::DST,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerPosition::QB => "QB",
            PlayerPosition::RB => "RB",
            PlayerPosition::WR => "WR",
            PlayerPosition::TE => "TE",
            PlayerPosition::K => "K",
            PlayerPosition::DST => "DST",
        }
    }
}

impl FromStr for PlayerPosition {
    type Err = PositionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "QB" => Ok(PlayerPosition::QB),
            "RB" => Ok(PlayerPosition::RB),
            "WR" => Ok(PlayerPosition::WR),
            "TE" => Ok(PlayerPosition::TE),
            "K" => Ok(PlayerPosition::K),
            "DST" | "DEF" => Ok(PlayerPosition::DST),
            _ => Err(PositionParseError(s.to_string())),
        }
    }
}

impl TryFrom<String> for PlayerPosition {
    type Error = PositionParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PlayerPosition> for String {
    fn from(position: PlayerPosition) -> Self {
        position.as_str().to_string()
    }
}

impl fmt::Display for PlayerPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
