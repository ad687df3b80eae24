//! Player directory loader - CSV → InMemoryPlayerDirectory
//!
//! Expected header: `player_id,name,team,position` (team may be empty).
//! Rows with an unknown position or a missing id are skipped and counted.

use anyhow::{Context, Result};
use roster_core::{InMemoryPlayerDirectory, PlayerInfo, PlayerPosition};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::warn;

/// CSV parsing statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub total_rows: u32,
    pub parsed: u32,
    pub failed: u32,
    /// Rows whose player_id appeared earlier in the file
    pub replaced: u32,
}

#[derive(Debug, Deserialize)]
struct PlayerRow {
    player_id: String,
    name: String,
    #[serde(default)]
    team: Option<String>,
    position: String,
}

/// Load a player directory from a CSV file.
pub fn load_players_csv(csv_path: &Path) -> Result<(InMemoryPlayerDirectory, ParseStats)> {
    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("Failed to open CSV file: {}", csv_path.display()))?;
    parse_players(file).with_context(|| format!("Failed to read players from {}", csv_path.display()))
}

pub fn parse_players<R: Read>(input: R) -> Result<(InMemoryPlayerDirectory, ParseStats)> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).trim(csv::Trim::All).from_reader(input);

    let mut directory = InMemoryPlayerDirectory::new();
    let mut stats = ParseStats::default();

    for result in reader.deserialize::<PlayerRow>() {
        stats.total_rows += 1;
        // +1 for the header line
        let line = stats.total_rows + 1;

        let row = match result {
            Ok(row) => row,
            Err(e) => {
                stats.failed += 1;
                warn!(line, "skipping malformed player row: {}", e);
                continue;
            }
        };

        if row.player_id.is_empty() {
            stats.failed += 1;
            warn!(line, "skipping player row without player_id");
            continue;
        }

        let position = match row.position.parse::<PlayerPosition>() {
            Ok(position) => position,
            Err(e) => {
                stats.failed += 1;
                warn!(line, player_id = %row.player_id, "skipping player: {}", e);
                continue;
            }
        };

        let mut player = PlayerInfo::new(row.player_id, row.name, position);
        if let Some(team) = row.team.filter(|t| !t.is_empty()) {
            player = player.with_team(team);
        }

        if directory.insert(player).is_some() {
            stats.replaced += 1;
        }
        stats.parsed += 1;
    }

    Ok((directory, stats))
}
