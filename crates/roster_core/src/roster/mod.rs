//! Roster slot allocation engine.
//!
//! - [`EligibilityResolver`]: which positions may fill a slot
//! - [`SlotAllocator`]: slot enumeration and open-slot queries
//! - [`RosterAssignment`]: the player ↔ slot mapping and its mutations
//! - [`LineupOrderer`]: display ordering of starters, bench and IR

pub mod allocator;
pub mod assignment;
pub mod eligibility;
pub mod lineup;


pub use allocator::SlotAllocator;
pub use assignment::{RosterAssignment, RosterEntry};
pub use eligibility::{EligibilityResolver, EligibilitySet};
pub use lineup::{LineupOrderer, LineupRow};
