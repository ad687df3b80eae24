//! Roster CLI Library
//!
//! Team file (JSON) load/save and player directory (CSV) loading for the
//! `roster` command.

pub mod players;

use anyhow::{bail, Context, Result};
use roster_core::{RosterRules, StoreError, Team};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

pub use players::{load_players_csv, parse_players, ParseStats};

/// Rules from `--rules FILE`, else from `ROSTER_RULES_PATH`, else the
/// standard rules.
pub fn load_rules(path: Option<&Path>) -> Result<RosterRules> {
    match path {
        Some(path) => RosterRules::from_path(path)
            .with_context(|| format!("Failed to load roster rules: {}", path.display())),
        None => RosterRules::from_env().context("Failed to load roster rules from environment"),
    }
}

/// Read a team file. Slots outside the team's layout are rejected.
pub fn load_team(path: &Path) -> Result<Team> {
    let json = fs::read_to_string(path).with_context(|| format!("Failed to read team file: {}", path.display()))?;
    let team: Team =
        serde_json::from_str(&json).with_context(|| format!("Failed to parse team file: {}", path.display()))?;

    let orphans: Vec<String> = team.assignment.orphaned_slots(team.config()).map(|s| s.to_string()).collect();
    if !orphans.is_empty() {
        bail!(
            "Team file {} places players in slots its layout does not define: {}",
            path.display(),
            orphans.join(", ")
        );
    }

    debug!(path = %path.display(), team_id = %team.id, version = team.version, "loaded team");
    Ok(team)
}

/// Write `team` to `path` through a uniquely named temporary file in the same
/// directory and an atomic rename.
///
/// With `expected_version`, the write only happens if the file on disk is
/// still at that version; a concurrent edit fails with
/// [`StoreError::VersionConflict`]. The check and the rename are separate
/// steps, so two writers racing between them can still both succeed; the
/// last rename wins and the file is never left half-written.
pub fn save_team(path: &Path, team: &Team, expected_version: Option<u64>) -> Result<()> {
    if let Some(expected) = expected_version {
        let on_disk = load_team(path)?;
        if on_disk.version != expected {
            return Err(StoreError::VersionConflict { team_id: team.id, expected, found: on_disk.version }.into());
        }
    }

    let json = serde_json::to_string_pretty(team).context("Failed to serialize team")?;
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
    tmp.write_all(json.as_bytes())
        .with_context(|| format!("Failed to write temp file: {}", tmp.path().display()))?;
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to replace team file: {}", path.display()))?;

    debug!(path = %path.display(), version = team.version, "saved team");
    Ok(())
}

/// Write a new team file; refuses to overwrite unless `force`.
pub fn create_team_file(path: &Path, team: &Team, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("Team file already exists: {} (use --force to overwrite)", path.display());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }
    save_team(path, team, None)
}
