//! The mutable player ↔ slot mapping of one team.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use super::eligibility::EligibilityResolver;
use crate::error::RosterError;
use crate::models::{PlayerPosition, RosterConfiguration, RosterSlot};

/// One placed player, as stored by the team store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub player_id: String,
    pub roster_slot: RosterSlot,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Placement {
    player_id: String,
    added_at: DateTime<Utc>,
}

/// Player ↔ slot mapping.
///
/// Invariants: at most one player per slot, at most one slot per player.
/// Every mutation either succeeds completely or leaves the mapping
/// untouched.
///
/// Serialized as a list of [`RosterEntry`]; a list that places two players
/// in one slot (or one player twice) is rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<RosterEntry>", into = "Vec<RosterEntry>")]
pub struct RosterAssignment {
    slots: BTreeMap<RosterSlot, Placement>,
    players: HashMap<String, RosterSlot>,
}

impl RosterAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Player in `slot`, if any.
    pub fn get(&self, slot: &RosterSlot) -> Option<&str> {
        self.slots.get(slot).map(|p| p.player_id.as_str())
    }

    pub fn is_occupied(&self, slot: &RosterSlot) -> bool {
        self.slots.contains_key(slot)
    }

    /// Slot currently held by `player_id`.
    pub fn slot_of(&self, player_id: &str) -> Option<&RosterSlot> {
        self.players.get(player_id)
    }

    pub fn contains_player(&self, player_id: &str) -> bool {
        self.players.contains_key(player_id)
    }

    pub fn added_at(&self, player_id: &str) -> Option<DateTime<Utc>> {
        self.players.get(player_id).and_then(|slot| self.slots.get(slot)).map(|p| p.added_at)
    }

    /// Occupied slots in slot order.
    pub fn occupied_slots(&self) -> impl Iterator<Item = &RosterSlot> {
        self.slots.keys()
    }

    /// `(slot, player_id)` pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (&RosterSlot, &str)> {
        self.slots.iter().map(|(slot, p)| (slot, p.player_id.as_str()))
    }

    pub fn entries(&self) -> Vec<RosterEntry> {
        self.slots
            .iter()
            .map(|(slot, p)| RosterEntry {
                player_id: p.player_id.clone(),
                roster_slot: slot.clone(),
                added_at: p.added_at,
            })
            .collect()
    }

    /// Run every `add` precondition without mutating anything.
    ///
    /// Checked in order: the slot exists, the slot is free, the player is not
    /// already rostered, the player's position is eligible for the slot.
    pub fn check_add(
        &self,
        config: &RosterConfiguration,
        resolver: &EligibilityResolver,
        slot: &RosterSlot,
        player_id: &str,
        position: PlayerPosition,
    ) -> Result<(), RosterError> {
        if !config.contains(slot) {
            return Err(RosterError::SlotNotFound { slot: slot.clone() });
        }

        if let Some(occupant) = self.slots.get(slot) {
            return Err(RosterError::SlotOccupied {
                slot: slot.clone(),
                occupant: occupant.player_id.clone(),
            });
        }

        if let Some(current) = self.players.get(player_id) {
            return Err(RosterError::PlayerAlreadyRostered {
                player_id: player_id.to_string(),
                slot: current.clone(),
            });
        }

        resolver.check(slot, position)
    }

    /// Place `player_id` into `slot`.
    pub fn add(
        &mut self,
        config: &RosterConfiguration,
        resolver: &EligibilityResolver,
        slot: RosterSlot,
        player_id: &str,
        position: PlayerPosition,
    ) -> Result<(), RosterError> {
        self.add_at(config, resolver, slot, player_id, position, Utc::now())
    }

    /// [`add`](Self::add) with an explicit placement time.
    pub fn add_at(
        &mut self,
        config: &RosterConfiguration,
        resolver: &EligibilityResolver,
        slot: RosterSlot,
        player_id: &str,
        position: PlayerPosition,
        added_at: DateTime<Utc>,
    ) -> Result<(), RosterError> {
        self.check_add(config, resolver, &slot, player_id, position)?;

        debug!(player_id, slot = %slot, %position, "placing player");
        self.insert(slot, Placement { player_id: player_id.to_string(), added_at });
        Ok(())
    }

    /// Take `player_id` off the roster; returns the slot it held.
    pub fn remove(&mut self, player_id: &str) -> Result<RosterSlot, RosterError> {
        let slot = self
            .players
            .get(player_id)
            .cloned()
            .ok_or_else(|| RosterError::PlayerNotRostered { player_id: player_id.to_string() })?;

        self.take(&slot);
        debug!(player_id, slot = %slot, "removed player");
        Ok(slot)
    }

    /// Move a rostered player to `new_slot`, re-checking every `add`
    /// precondition against the new slot. On failure the player stays where
    /// it was. Returns the slot the player left.
    pub fn move_player(
        &mut self,
        config: &RosterConfiguration,
        resolver: &EligibilityResolver,
        player_id: &str,
        new_slot: RosterSlot,
        position: PlayerPosition,
    ) -> Result<RosterSlot, RosterError> {
        let old_slot = self
            .players
            .get(player_id)
            .cloned()
            .ok_or_else(|| RosterError::PlayerNotRostered { player_id: player_id.to_string() })?;

        let Some(placement) = self.take(&old_slot) else {
            return Err(RosterError::PlayerNotRostered { player_id: player_id.to_string() });
        };

        match self.check_add(config, resolver, &new_slot, player_id, position) {
            Ok(()) => {
                debug!(player_id, from = %old_slot, to = %new_slot, "moved player");
                self.insert(new_slot, placement);
                Ok(old_slot)
            }
            Err(err) => {
                self.insert(old_slot, placement);
                Err(err)
            }
        }
    }

    /// Slots that do not exist under `config`.
    ///
    /// Empty for any assignment built through `add`; used to vet
    /// assignments loaded from outside.
    pub fn orphaned_slots<'a>(&'a self, config: &'a RosterConfiguration) -> impl Iterator<Item = &'a RosterSlot> {
        self.slots.keys().filter(move |slot| !config.contains(slot))
    }

    fn insert(&mut self, slot: RosterSlot, placement: Placement) {
        self.players.insert(placement.player_id.clone(), slot.clone());
        self.slots.insert(slot, placement);
    }

    fn take(&mut self, slot: &RosterSlot) -> Option<Placement> {
        let placement = self.slots.remove(slot)?;
        self.players.remove(&placement.player_id);
        Some(placement)
    }
}

impl TryFrom<Vec<RosterEntry>> for RosterAssignment {
    type Error = RosterError;

    fn try_from(entries: Vec<RosterEntry>) -> Result<Self, Self::Error> {
        let mut assignment = RosterAssignment::new();
        for entry in entries {
            if let Some(occupant) = assignment.slots.get(&entry.roster_slot) {
                return Err(RosterError::SlotOccupied {
                    slot: entry.roster_slot,
                    occupant: occupant.player_id.clone(),
                });
            }
            if let Some(current) = assignment.players.get(&entry.player_id) {
                return Err(RosterError::PlayerAlreadyRostered {
                    player_id: entry.player_id,
                    slot: current.clone(),
                });
            }
            assignment.insert(
                entry.roster_slot,
                Placement { player_id: entry.player_id, added_at: entry.added_at },
            );
        }
        Ok(assignment)
    }
}

impl From<RosterAssignment> for Vec<RosterEntry> {
    fn from(assignment: RosterAssignment) -> Self {
        assignment.entries()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RosterRules, UnknownSlotPolicy};
    use PlayerPosition::*;

    fn scenario_config() -> RosterConfiguration {
        RosterConfiguration::new(
            [("QB", 1), ("RB", 2), ("WR", 2), ("TE", 1), ("FLEX", 1), ("DST", 1), ("K", 1)],
            6,
            1,
        )
        .unwrap()
    }

    #[test]
    fn test_add_and_lookup() {
        let config = scenario_config();
        let resolver = EligibilityResolver::standard();
        let mut roster = RosterAssignment::new();

        roster.add(&config, &resolver, RosterSlot::starter("QB", 1), "p-qb", QB).unwrap();

        assert_eq!(roster.len(), 1);
        assert_eq!(roster.get(&RosterSlot::starter("QB", 1)), Some("p-qb"));
        assert_eq!(roster.slot_of("p-qb"), Some(&RosterSlot::starter("QB", 1)));
        assert!(roster.added_at("p-qb").is_some());
    }

    #[test]
    fn test_add_rejects_unknown_slot() {
        let config = scenario_config();
        let resolver = EligibilityResolver::standard();
        let mut roster = RosterAssignment::new();

        let err = roster.add(&config, &resolver, RosterSlot::starter("RB", 3), "p1", RB).unwrap_err();
        assert_eq!(err, RosterError::SlotNotFound { slot: RosterSlot::starter("RB", 3) });

        let err = roster.add(&config, &resolver, RosterSlot::ir(2), "p1", RB).unwrap_err();
        assert!(matches!(err, RosterError::SlotNotFound { .. }));
        assert!(roster.is_empty());
    }

    #[test]
    fn test_rb_into_wr_slot_is_ineligible() {
        let config = scenario_config();
        let resolver = EligibilityResolver::standard();
        let mut roster = RosterAssignment::new();

        let err = roster.add(&config, &resolver, RosterSlot::starter("WR", 1), "p-rb", RB).unwrap_err();
        assert_eq!(
            err,
            RosterError::PositionIneligible { position: RB, slot: RosterSlot::starter("WR", 1) }
        );
        assert!(roster.is_empty());
    }

    #[test]
    fn test_flex_accepts_te_then_reports_occupied() {
        let config = scenario_config();
        let resolver = EligibilityResolver::standard();
        let mut roster = RosterAssignment::new();
        let flex = RosterSlot::starter("FLEX", 1);

        roster.add(&config, &resolver, flex.clone(), "p-te", TE).unwrap();

        let err = roster.add(&config, &resolver, flex.clone(), "p-wr", WR).unwrap_err();
        assert_eq!(err, RosterError::SlotOccupied { slot: flex.clone(), occupant: "p-te".to_string() });
        assert_eq!(roster.get(&flex), Some("p-te"));
        assert!(!roster.contains_player("p-wr"));
    }

    #[test]
    fn test_same_player_twice_is_rejected() {
        let config = scenario_config();
        let resolver = EligibilityResolver::standard();
        let mut roster = RosterAssignment::new();

        roster.add(&config, &resolver, RosterSlot::starter("RB", 1), "p-rb", RB).unwrap();
        let err = roster.add(&config, &resolver, RosterSlot::bench(1), "p-rb", RB).unwrap_err();

        assert_eq!(
            err,
            RosterError::PlayerAlreadyRostered {
                player_id: "p-rb".to_string(),
                slot: RosterSlot::starter("RB", 1),
            }
        );
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.slot_of("p-rb"), Some(&RosterSlot::starter("RB", 1)));
        assert!(!roster.is_occupied(&RosterSlot::bench(1)));
    }

    #[test]
    fn test_precondition_order_slot_before_player() {
        let config = scenario_config();
        let resolver = EligibilityResolver::standard();
        let mut roster = RosterAssignment::new();
        roster.add(&config, &resolver, RosterSlot::bench(1), "p1", WR).unwrap();
        roster.add(&config, &resolver, RosterSlot::bench(2), "p2", WR).unwrap();

        // Occupied slot wins over already-rostered player
        let err = roster.add(&config, &resolver, RosterSlot::bench(2), "p1", WR).unwrap_err();
        assert!(matches!(err, RosterError::SlotOccupied { .. }));

        // Already-rostered player wins over ineligibility
        let err = roster.add(&config, &resolver, RosterSlot::starter("K", 1), "p1", WR).unwrap_err();
        assert!(matches!(err, RosterError::PlayerAlreadyRostered { .. }));
    }

    #[test]
    fn test_remove() {
        let config = scenario_config();
        let resolver = EligibilityResolver::standard();
        let mut roster = RosterAssignment::new();
        roster.add(&config, &resolver, RosterSlot::ir(1), "p-ir", K).unwrap();

        assert_eq!(roster.remove("p-ir"), Ok(RosterSlot::ir(1)));
        assert!(roster.is_empty());
        assert_eq!(
            roster.remove("p-ir"),
            Err(RosterError::PlayerNotRostered { player_id: "p-ir".to_string() })
        );
    }

    #[test]
    fn test_move_success_keeps_added_at() {
        let config = scenario_config();
        let resolver = EligibilityResolver::standard();
        let mut roster = RosterAssignment::new();
        roster.add(&config, &resolver, RosterSlot::bench(3), "p-wr", WR).unwrap();
        let added_at = roster.added_at("p-wr");

        let old = roster.move_player(&config, &resolver, "p-wr", RosterSlot::starter("WR", 2), WR).unwrap();

        assert_eq!(old, RosterSlot::bench(3));
        assert_eq!(roster.slot_of("p-wr"), Some(&RosterSlot::starter("WR", 2)));
        assert!(!roster.is_occupied(&RosterSlot::bench(3)));
        assert_eq!(roster.added_at("p-wr"), added_at);
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn test_move_failure_restores_original_slot() {
        let config = scenario_config();
        let resolver = EligibilityResolver::standard();
        let mut roster = RosterAssignment::new();
        roster.add(&config, &resolver, RosterSlot::starter("QB", 1), "p-qb", QB).unwrap();
        roster.add(&config, &resolver, RosterSlot::bench(1), "p-k", K).unwrap();
        let before = roster.clone();

        let err = roster.move_player(&config, &resolver, "p-k", RosterSlot::starter("FLEX", 1), K).unwrap_err();
        assert!(matches!(err, RosterError::PositionIneligible { .. }));
        assert_eq!(roster, before);

        let err = roster.move_player(&config, &resolver, "p-k", RosterSlot::starter("QB", 1), K).unwrap_err();
        assert!(matches!(err, RosterError::SlotOccupied { .. }));
        assert_eq!(roster, before);

        let err = roster.move_player(&config, &resolver, "nobody", RosterSlot::bench(2), K).unwrap_err();
        assert!(matches!(err, RosterError::PlayerNotRostered { .. }));
    }

    #[test]
    fn test_move_to_own_slot_is_a_no_op() {
        let config = scenario_config();
        let resolver = EligibilityResolver::standard();
        let mut roster = RosterAssignment::new();
        roster.add(&config, &resolver, RosterSlot::starter("TE", 1), "p-te", TE).unwrap();
        let before = roster.clone();

        roster.move_player(&config, &resolver, "p-te", RosterSlot::starter("TE", 1), TE).unwrap();
        assert_eq!(roster, before);
    }

    #[test]
    fn test_unknown_label_permissive_accepts_any_position() {
        let config = RosterConfiguration::new([("QB", 1), ("OP", 1)], 1, 0).unwrap();
        let resolver = EligibilityResolver::standard();
        let mut roster = RosterAssignment::new();

        roster.add(&config, &resolver, RosterSlot::starter("op", 1), "p-k", K).unwrap();
        assert_eq!(roster.get(&RosterSlot::starter("OP", 1)), Some("p-k"));

        // Out of range still fails first
        let err = roster.add(&config, &resolver, RosterSlot::starter("OP", 2), "p-qb", QB).unwrap_err();
        assert!(matches!(err, RosterError::SlotNotFound { .. }));

        roster.add(&config, &resolver, RosterSlot::bench(1), "p-dst", DST).unwrap();
        roster.remove("p-k").unwrap();
        roster.move_player(&config, &resolver, "p-dst", RosterSlot::starter("OP", 1), DST).unwrap();
        assert_eq!(roster.slot_of("p-dst"), Some(&RosterSlot::starter("OP", 1)));
    }

    #[test]
    fn test_unknown_label_strict_rejects_after_slot_checks() {
        let config = RosterConfiguration::new([("QB", 1), ("OP", 1)], 1, 0).unwrap();
        let rules = RosterRules::standard().with_unknown_slot_policy(UnknownSlotPolicy::Strict);
        let resolver = EligibilityResolver::new(&rules);
        let mut roster = RosterAssignment::new();
        let unknown = RosterError::UnknownSlotType { label: "OP".to_string() };

        let err = roster.add(&config, &resolver, RosterSlot::starter("OP", 2), "p-qb", QB).unwrap_err();
        assert_eq!(err, RosterError::SlotNotFound { slot: RosterSlot::starter("OP", 2) });

        let err = roster.add(&config, &resolver, RosterSlot::starter("OP", 1), "p-qb", QB).unwrap_err();
        assert_eq!(err, unknown);
        assert!(roster.is_empty());

        roster.add(&config, &resolver, RosterSlot::bench(1), "p-qb", QB).unwrap();
        let before = roster.clone();
        let err = roster.move_player(&config, &resolver, "p-qb", RosterSlot::starter("OP", 1), QB).unwrap_err();
        assert_eq!(err, unknown);
        assert_eq!(roster, before);

        // Known labels are unaffected
        roster.move_player(&config, &resolver, "p-qb", RosterSlot::starter("QB", 1), QB).unwrap();
    }

    #[test]
    fn test_serde_rejects_double_occupancy() {
        let json = r#"[
            {"player_id": "a", "roster_slot": {"type": "bench", "index": 1}, "added_at": "2024-09-01T12:00:00Z"},
            {"player_id": "b", "roster_slot": {"type": "bench", "index": 1}, "added_at": "2024-09-01T12:00:00Z"}
        ]"#;
        assert!(serde_json::from_str::<RosterAssignment>(json).is_err());

        let json = r#"[
            {"player_id": "a", "roster_slot": {"type": "bench", "index": 1}, "added_at": "2024-09-01T12:00:00Z"},
            {"player_id": "a", "roster_slot": {"type": "bench", "index": 2}, "added_at": "2024-09-01T12:00:00Z"}
        ]"#;
        assert!(serde_json::from_str::<RosterAssignment>(json).is_err());
    }

    #[test]
    fn test_serde_round_trip_and_orphans() {
        let config = scenario_config();
        let resolver = EligibilityResolver::standard();
        let mut roster = RosterAssignment::new();
        roster.add(&config, &resolver, RosterSlot::starter("RB", 2), "p-rb", RB).unwrap();
        roster.add(&config, &resolver, RosterSlot::ir(1), "p-ir", WR).unwrap();

        let json = serde_json::to_string(&roster).unwrap();
        let back: RosterAssignment = serde_json::from_str(&json).unwrap();
        assert_eq!(back, roster);
        assert_eq!(back.orphaned_slots(&config).count(), 0);

        let smaller = RosterConfiguration::new([("QB", 1), ("RB", 1)], 2, 0).unwrap();
        let orphans: Vec<&RosterSlot> = back.orphaned_slots(&smaller).collect();
        assert_eq!(orphans, vec![&RosterSlot::starter("RB", 2), &RosterSlot::ir(1)]);
    }
}
