use thiserror::Error;
use uuid::Uuid;

use crate::models::{PlayerPosition, RosterSlot};

/// Rejected roster mutations.
///
/// Every variant is an expected outcome of a user action. A failed
/// `add`/`remove`/`move` leaves the assignment exactly as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    #[error("Slot {slot} does not exist in this roster configuration")]
    SlotNotFound { slot: RosterSlot },

    #[error("Slot {slot} is already occupied by {occupant}")]
    SlotOccupied { slot: RosterSlot, occupant: String },

    #[error("Player {player_id} already occupies {slot}")]
    PlayerAlreadyRostered { player_id: String, slot: RosterSlot },

    #[error("Player {player_id} is not on this roster")]
    PlayerNotRostered { player_id: String },

    #[error("Player position {position} is not eligible for {slot}")]
    PositionIneligible { position: PlayerPosition, slot: RosterSlot },

    #[error("Unknown slot type: {label}")]
    UnknownSlotType { label: String },
}

impl RosterError {
    pub fn code(&self) -> &'static str {
        match self {
            RosterError::SlotNotFound { .. } => "SLOT_NOT_FOUND",
            RosterError::SlotOccupied { .. } => "SLOT_OCCUPIED",
            RosterError::PlayerAlreadyRostered { .. } => "PLAYER_ALREADY_ROSTERED",
            RosterError::PlayerNotRostered { .. } => "PLAYER_NOT_ROSTERED",
            RosterError::PositionIneligible { .. } => "POSITION_INELIGIBLE",
            RosterError::UnknownSlotType { .. } => "UNKNOWN_SLOT_TYPE",
        }
    }

    /// All roster errors leave prior state untouched, so the caller can
    /// always surface them and let the user try again.
    pub fn is_recoverable(&self) -> bool {
        true
    }
}

/// Problems with a roster configuration, team settings or rule file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Count for {field} must not be negative, got {count}")]
    NegativeCount { field: String, count: i64 },

    #[error("Count for {field} must be at most {max}, got {count}")]
    SlotCountTooLarge { field: String, count: u64, max: u32 },

    #[error("Roster layout has {total} slots, at most {max} allowed")]
    TooManySlots { total: u64, max: u32 },

    #[error("At least one starting position must be defined")]
    EmptyStarters,

    #[error("Position {position} count must be at least 1, got {count}")]
    NonPositiveStarterCount { position: String, count: u32 },

    #[error("Invalid starting position: {position}")]
    UnknownStarterPosition { position: String },

    #[error("Starting position {position} is defined more than once")]
    DuplicatePosition { position: String },

    #[error("Invalid team name: {0}")]
    InvalidTeamName(String),

    #[error("Invalid league name: {0}")]
    InvalidLeagueName(String),

    #[error("Invalid league size: {0}. Must be between 4 and 32")]
    InvalidLeagueSize(u32),

    #[error("Invalid roster rules: {0}")]
    InvalidRules(String),

    #[error("Failed to read rules file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse rules: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::NegativeCount { .. } => "NEGATIVE_COUNT",
            ConfigError::SlotCountTooLarge { .. } => "SLOT_COUNT_TOO_LARGE",
            ConfigError::TooManySlots { .. } => "TOO_MANY_SLOTS",
            ConfigError::EmptyStarters => "EMPTY_STARTERS",
            ConfigError::NonPositiveStarterCount { .. } => "NON_POSITIVE_STARTER_COUNT",
            ConfigError::UnknownStarterPosition { .. } => "UNKNOWN_STARTER_POSITION",
            ConfigError::DuplicatePosition { .. } => "DUPLICATE_POSITION",
            ConfigError::InvalidTeamName(_) => "INVALID_TEAM_NAME",
            ConfigError::InvalidLeagueName(_) => "INVALID_LEAGUE_NAME",
            ConfigError::InvalidLeagueSize(_) => "INVALID_LEAGUE_SIZE",
            ConfigError::InvalidRules(_) => "INVALID_RULES",
            ConfigError::Io { .. } => "RULES_IO",
            ConfigError::Yaml(_) => "RULES_PARSE",
        }
    }

    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ConfigError::Io { .. } | ConfigError::Yaml(_) | ConfigError::InvalidRules(_))
    }
}

/// Failures reported by a [`TeamStore`](crate::store::TeamStore).
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Team not found: {team_id}")]
    TeamNotFound { team_id: Uuid },

    #[error("Team {team_id} changed concurrently: expected version {expected}, found {found}")]
    VersionConflict { team_id: Uuid, expected: u64, found: u64 },

    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl StoreError {
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::TeamNotFound { .. } => "TEAM_NOT_FOUND",
            StoreError::VersionConflict { .. } => "VERSION_CONFLICT",
            StoreError::Roster(err) => err.code(),
            StoreError::Config(err) => err.code(),
        }
    }

    pub fn is_recoverable(&self) -> bool {
        match self {
            StoreError::TeamNotFound { .. } => false,
            // Re-read and retry
            StoreError::VersionConflict { .. } => true,
            StoreError::Roster(err) => err.is_recoverable(),
            StoreError::Config(err) => err.is_recoverable(),
        }
    }
}

/// Errors surfaced by [`RosterService`](crate::service::RosterService).
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Player not found in directory: {player_id}")]
    PlayerNotFound { player_id: String },
}

impl ServiceError {
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::Store(err) => err.code(),
            ServiceError::PlayerNotFound { .. } => "PLAYER_NOT_FOUND",
        }
    }

    pub fn is_recoverable(&self) -> bool {
        match self {
            ServiceError::Store(err) => err.is_recoverable(),
            ServiceError::PlayerNotFound { .. } => false,
        }
    }

    /// The roster-level cause, if this failure was a rejected mutation.
    pub fn roster_error(&self) -> Option<&RosterError> {
        match self {
            ServiceError::Store(StoreError::Roster(err)) => Some(err),
            _ => None,
        }
    }
}

impl From<RosterError> for ServiceError {
    fn from(err: RosterError) -> Self {
        ServiceError::Store(StoreError::Roster(err))
    }
}

impl From<ConfigError> for ServiceError {
    fn from(err: ConfigError) -> Self {
        ServiceError::Store(StoreError::Config(err))
    }
}

/// A position label that is not one of QB, RB, WR, TE, K, DST (or DEF).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown player position: {0}")]
pub struct PositionParseError(pub String);

pub type Result<T> = std::result::Result<T, RosterError>;
