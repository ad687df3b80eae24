//! # Roster Rules
//!
//! Every tunable rule of the roster engine lives here instead of in
//! module-level tables: which player positions may fill which slot, what
//! happens with unknown slot labels, and how starters are ordered for
//! display.
//!
//! ## Usage
//! ```rust
//! use roster_core::config::{RosterRules, UnknownSlotPolicy};
//!
//! let rules = RosterRules::standard();
//! assert_eq!(rules.unknown_slot_policy, UnknownSlotPolicy::Permissive);
//!
//! let strict = RosterRules::standard().with_unknown_slot_policy(UnknownSlotPolicy::Strict);
//! assert!(strict.validate().is_ok());
//! ```

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path};

use crate::error::ConfigError;
use crate::models::{canonical_label, PlayerPosition};

/// Environment variable naming an alternate rules file.
pub const RULES_PATH_ENV: &str = "ROSTER_RULES_PATH";

const STANDARD_RULES_YAML: &str = include_str!("standard_rules.yaml");

static STANDARD_RULES: Lazy<RosterRules> = Lazy::new(|| {
    RosterRules::from_yaml_str(STANDARD_RULES_YAML).expect("embedded standard rules must parse")
});

/// What eligibility does with a starter label it has no entry for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnknownSlotPolicy {
    /// Any position may fill the slot (logged as a warning).
    #[default]
    Permissive,
    /// No position may fill the slot; placements fail with `UnknownSlotType`.
    Strict,
}

/// Display ordering of starter slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineupRules {
    /// Base order per starter label; lower sorts first.
    pub priorities: IndexMap<String, u32>,
    /// Base order for labels missing from `priorities`.
    #[serde(default = "default_fallback_order")]
    pub fallback_order: u32,
    /// Room reserved per label for same-position sub-slots (RB1, RB2, ...).
    #[serde(default = "default_sub_slot_multiplier")]
    pub sub_slot_multiplier: u32,
}

fn default_fallback_order() -> u32 {
    999
}

fn default_sub_slot_multiplier() -> u32 {
    100
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterRules {
    /// Starter slot label -> positions allowed in it
    pub eligibility: IndexMap<String, Vec<PlayerPosition>>,
    /// Positions allowed on bench and IR
    pub reserve_positions: Vec<PlayerPosition>,
    #[serde(default)]
    pub unknown_slot_policy: UnknownSlotPolicy,
    /// Starter labels accepted when a team is created
    pub valid_starter_labels: Vec<String>,
    pub lineup: LineupRules,
}

impl RosterRules {
    /// The embedded standard rule set.
    pub fn standard() -> Self {
        STANDARD_RULES.clone()
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let rules: RosterRules = serde_yaml::from_str(yaml)?;
        let rules = rules.normalized();
        rules.validate()?;
        Ok(rules)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.display().to_string(), source })?;
        Self::from_yaml_str(&content)
    }

    /// Rules from the file named by `ROSTER_RULES_PATH`, or the standard
    /// rules when the variable is unset or blank.
    pub fn from_env() -> Result<Self, ConfigError> {
        let Ok(path) = env::var(RULES_PATH_ENV) else {
            return Ok(Self::standard());
        };

        let path = path.trim();
        if path.is_empty() {
            return Ok(Self::standard());
        }

        tracing::debug!(path, "loading roster rules from {}", RULES_PATH_ENV);
        Self::from_path(path)
    }

    pub fn with_unknown_slot_policy(mut self, policy: UnknownSlotPolicy) -> Self {
        self.unknown_slot_policy = policy;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lineup.sub_slot_multiplier < 2 {
            return Err(ConfigError::InvalidRules(format!(
                "sub_slot_multiplier must be at least 2, got {}",
                self.lineup.sub_slot_multiplier
            )));
        }

        if self.reserve_positions.is_empty() {
            return Err(ConfigError::InvalidRules(
                "reserve_positions must not be empty".to_string(),
            ));
        }

        if let Some((label, _)) = self.eligibility.iter().find(|(_, positions)| positions.is_empty()) {
            return Err(ConfigError::InvalidRules(format!(
                "eligibility for {} must list at least one position",
                label
            )));
        }

        Ok(())
    }

    pub fn is_valid_starter_label(&self, label: &str) -> bool {
        let label = canonical_label(label);
        self.valid_starter_labels.iter().any(|valid| *valid == label)
    }

    // Rule files may be written in any case; lookups use canonical labels.
    fn normalized(self) -> Self {
        Self {
            eligibility: self
                .eligibility
                .into_iter()
                .map(|(label, positions)| (canonical_label(&label), positions))
                .collect(),
            valid_starter_labels: self.valid_starter_labels.iter().map(|l| canonical_label(l)).collect(),
            lineup: LineupRules {
                priorities: self
                    .lineup
                    .priorities
                    .into_iter()
                    .map(|(label, order)| (canonical_label(&label), order))
                    .collect(),
                ..self.lineup
            },
            ..self
        }
    }
}

impl Default for RosterRules {
    fn default() -> Self {
        Self::standard()
    }
}
