pub mod configuration;
pub mod player;
pub mod position;
pub mod slot;
pub mod team;

pub use configuration::{RosterConfiguration, RosterPositions, MAX_SLOTS_PER_GROUP, MAX_TOTAL_SLOTS};
pub use player::PlayerInfo;
pub use position::PlayerPosition;
pub use slot::{canonical_label, RosterSlot, SlotKind, RESERVE_MARKER};
pub use team::{ScoringSystem, Team, TeamSettings, TeamSettingsUpdate};
