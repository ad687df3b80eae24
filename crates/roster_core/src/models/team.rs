use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::configuration::RosterConfiguration;
use crate::config::RosterRules;
use crate::error::ConfigError;
use crate::roster::RosterAssignment;

const MAX_NAME_LEN: usize = 255;
const LEAGUE_SIZE_MIN: u32 = 4;
const LEAGUE_SIZE_MAX: u32 = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScoringSystem {
    #[default]
    Ppr,
    HalfPpr,
    Standard,
}

impl ScoringSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoringSystem::Ppr => "ppr",
            ScoringSystem::HalfPpr => "half_ppr",
            ScoringSystem::Standard => "standard",
        }
    }
}

impl std::str::FromStr for ScoringSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "ppr" => Ok(ScoringSystem::Ppr),
            "half_ppr" | "half" => Ok(ScoringSystem::HalfPpr),
            "standard" | "std" => Ok(ScoringSystem::Standard),
            other => Err(format!("unknown scoring system: {}", other)),
        }
    }
}

fn default_league_size() -> u32 {
    12
}

/// League settings of a team, as supplied at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSettings {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub league_name: Option<String>,
    #[serde(default)]
    pub scoring_system: ScoringSystem,
    #[serde(default = "default_league_size")]
    pub league_size: u32,
    #[serde(default)]
    pub roster_positions: RosterConfiguration,
}

impl TeamSettings {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            league_name: None,
            scoring_system: ScoringSystem::default(),
            league_size: default_league_size(),
            roster_positions: RosterConfiguration::standard(),
        }
    }

    pub fn with_roster_positions(mut self, roster_positions: RosterConfiguration) -> Self {
        self.roster_positions = roster_positions;
        self
    }

    /// Team-creation checks. Bench and IR may be zero; every starter label
    /// must be a valid starter label and hold at least one slot.
    pub fn validate(&self, rules: &RosterRules) -> Result<(), ConfigError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ConfigError::InvalidTeamName("name must not be empty".to_string()));
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(ConfigError::InvalidTeamName(format!(
                "name must be at most {} characters",
                MAX_NAME_LEN
            )));
        }

        if let Some(league) = &self.league_name {
            if league.chars().count() > MAX_NAME_LEN {
                return Err(ConfigError::InvalidLeagueName(format!(
                    "league name must be at most {} characters",
                    MAX_NAME_LEN
                )));
            }
        }

        if !(LEAGUE_SIZE_MIN..=LEAGUE_SIZE_MAX).contains(&self.league_size) {
            return Err(ConfigError::InvalidLeagueSize(self.league_size));
        }

        validate_roster_positions(&self.roster_positions, rules)
    }

    /// Apply the fields present in `update`. The roster layout never changes
    /// after creation.
    pub fn apply(&mut self, update: &TeamSettingsUpdate) {
        if let Some(name) = &update.name {
            self.name = name.clone();
        }
        if let Some(league_name) = &update.league_name {
            self.league_name = Some(league_name.clone());
        }
        if let Some(scoring_system) = update.scoring_system {
            self.scoring_system = scoring_system;
        }
        if let Some(league_size) = update.league_size {
            self.league_size = league_size;
        }
    }
}

fn validate_roster_positions(config: &RosterConfiguration, rules: &RosterRules) -> Result<(), ConfigError> {
    if config.starters().next().is_none() {
        return Err(ConfigError::EmptyStarters);
    }

    for (label, count) in config.starters() {
        if !rules.is_valid_starter_label(label) {
            return Err(ConfigError::UnknownStarterPosition { position: label.to_string() });
        }
        if count < 1 {
            return Err(ConfigError::NonPositiveStarterCount { position: label.to_string(), count });
        }
    }

    Ok(())
}

/// Partial settings change; absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSettingsUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub league_name: Option<String>,
    #[serde(default)]
    pub scoring_system: Option<ScoringSystem>,
    #[serde(default)]
    pub league_size: Option<u32>,
}

/// A fantasy team: its settings plus the live roster.
///
/// `version` starts at 0 and grows by one with every committed change; the
/// team store compares it on every write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: Uuid,
    #[serde(flatten)]
    pub settings: TeamSettings,
    #[serde(rename = "roster", default)]
    pub assignment: RosterAssignment,
    #[serde(default)]
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Team {
    /// New team with an empty roster. Settings are not validated here.
    pub fn new(settings: TeamSettings) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            settings,
            assignment: RosterAssignment::new(),
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn config(&self) -> &RosterConfiguration {
        &self.settings.roster_positions
    }

    /// Record a committed change.
    pub fn touch(&mut self) {
        self.version += 1;
        self.updated_at = Utc::now();
    }
}
