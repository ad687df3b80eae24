//! Slot enumeration and open-slot queries.

use super::assignment::RosterAssignment;
use super::eligibility::EligibilityResolver;
use crate::models::{PlayerPosition, RosterConfiguration, RosterSlot};

/// Stateless slot arithmetic over a [`RosterConfiguration`].
pub struct SlotAllocator;

impl SlotAllocator {
    /// Every slot of the layout: starters in configuration order (index
    /// 1..=count per label), then bench 1..=bench, then IR 1..=ir.
    pub fn slots(config: &RosterConfiguration) -> impl Iterator<Item = RosterSlot> + '_ {
        let starters = config
            .starters()
            .flat_map(|(label, count)| (1..=count).map(move |index| RosterSlot::starter(label, index)));
        let bench = (1..=config.bench()).map(RosterSlot::bench);
        let ir = (1..=config.ir()).map(RosterSlot::ir);

        starters.chain(bench).chain(ir)
    }

    pub fn all_slots(config: &RosterConfiguration) -> Vec<RosterSlot> {
        Self::slots(config).collect()
    }

    /// Unoccupied slots, in enumeration order.
    pub fn available_slots(config: &RosterConfiguration, assignment: &RosterAssignment) -> Vec<RosterSlot> {
        Self::slots(config).filter(|slot| !assignment.is_occupied(slot)).collect()
    }

    /// Unoccupied slots a `position` player could be placed into.
    pub fn available_slots_for(
        config: &RosterConfiguration,
        assignment: &RosterAssignment,
        resolver: &EligibilityResolver,
        position: PlayerPosition,
    ) -> Vec<RosterSlot> {
        Self::slots(config)
            .filter(|slot| !assignment.is_occupied(slot) && resolver.is_eligible(slot, position))
            .collect()
    }

    pub fn is_full(config: &RosterConfiguration, assignment: &RosterAssignment) -> bool {
        Self::slots(config).all(|slot| assignment.is_occupied(&slot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PlayerPosition::*;

    #[test]
    fn test_enumeration_order() {
        let config = RosterConfiguration::new([("QB", 1), ("RB", 2), ("FLEX", 1)], 2, 1).unwrap();
        let labels: Vec<String> = SlotAllocator::all_slots(&config).iter().map(|s| s.to_string()).collect();
        assert_eq!(labels, vec!["QB1", "RB1", "RB2", "FLEX1", "BN1", "BN2", "IR1"]);
    }

    #[test]
    fn test_zero_counts_yield_no_slots() {
        let config = RosterConfiguration::new([("QB", 0), ("RB", 1)], 0, 0).unwrap();
        assert_eq!(SlotAllocator::all_slots(&config), vec![RosterSlot::starter("RB", 1)]);
    }

    #[test]
    fn test_available_slots_shrink_as_players_are_added() {
        let config = RosterConfiguration::new([("QB", 1), ("RB", 1)], 1, 0).unwrap();
        let resolver = EligibilityResolver::standard();
        let mut roster = RosterAssignment::new();
        assert_eq!(SlotAllocator::available_slots(&config, &roster).len(), 3);

        roster.add(&config, &resolver, RosterSlot::starter("RB", 1), "p-rb", RB).unwrap();
        assert_eq!(
            SlotAllocator::available_slots(&config, &roster),
            vec![RosterSlot::starter("QB", 1), RosterSlot::bench(1)]
        );
        assert!(!SlotAllocator::is_full(&config, &roster));

        roster.add(&config, &resolver, RosterSlot::starter("QB", 1), "p-qb", QB).unwrap();
        roster.add(&config, &resolver, RosterSlot::bench(1), "p-b", WR).unwrap();
        assert!(SlotAllocator::available_slots(&config, &roster).is_empty());
        assert!(SlotAllocator::is_full(&config, &roster));
    }

    #[test]
    fn test_available_slots_for_position() {
        let config = RosterConfiguration::standard();
        let resolver = EligibilityResolver::standard();
        let roster = RosterAssignment::new();

        let te_slots = SlotAllocator::available_slots_for(&config, &roster, &resolver, TE);
        let labels: Vec<String> = te_slots.iter().map(|s| s.to_string()).collect();
        assert_eq!(labels, vec!["TE1", "FLEX1", "BN1", "BN2", "BN3", "BN4", "BN5", "BN6", "IR1"]);

        let k_starters: Vec<RosterSlot> = SlotAllocator::available_slots_for(&config, &roster, &resolver, K)
            .into_iter()
            .filter(RosterSlot::is_starter)
            .collect();
        assert_eq!(k_starters, vec![RosterSlot::starter("K", 1)]);
    }
}
