//! # roster_core - Fantasy Football Roster Slot Engine
//!
//! This library decides where players may sit on a fantasy roster and keeps
//! the player ↔ slot mapping consistent.
//!
//! ## Features
//! - Slot enumeration from a starter/bench/IR layout
//! - Configurable positional eligibility (FLEX, SUPER_FLEX, custom labels)
//! - Atomic add / remove / move with a fixed precondition order
//! - Deterministic lineup ordering for display
//! - Version-checked writes through a pluggable team store
//! - JSON API for easy integration

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod roster;
pub mod service;
pub mod store;

// Re-export main API functions
pub use api::{
    add_player_json, create_team_json, get_roster_json, move_player_json, remove_player_json, ApiError,
    ApiResponse,
};
pub use config::{LineupRules, RosterRules, UnknownSlotPolicy};
pub use error::{ConfigError, Result, RosterError, ServiceError, StoreError};

// Re-export model types
pub use models::{
    PlayerInfo, PlayerPosition, RosterConfiguration, RosterPositions, RosterSlot, ScoringSystem, SlotKind, Team,
    TeamSettings, TeamSettingsUpdate,
};

// Re-export the engine
pub use roster::{
    EligibilityResolver, EligibilitySet, LineupOrderer, LineupRow, RosterAssignment, RosterEntry, SlotAllocator,
};
pub use service::{RosterPlayer, RosterService, RosterView};
pub use store::{InMemoryPlayerDirectory, InMemoryTeamStore, PlayerDirectory, RosterSnapshot, TeamStore};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
