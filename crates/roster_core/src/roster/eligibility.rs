//! Slot eligibility: which player positions may occupy a roster slot.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::warn;

use crate::config::{RosterRules, UnknownSlotPolicy};
use crate::error::RosterError;
use crate::models::{canonical_label, PlayerPosition, RosterSlot, SlotKind};

/// Set of player positions allowed in one slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EligibilitySet(BTreeSet<PlayerPosition>);

impl EligibilitySet {
    pub fn empty() -> Self {
        Self(BTreeSet::new())
    }

    /// Every skill position: QB, RB, WR, TE, K, DST.
    pub fn all() -> Self {
        PlayerPosition::ALL.into_iter().collect()
    }

    pub fn contains(&self, position: PlayerPosition) -> bool {
        self.0.contains(&position)
    }

    pub fn iter(&self) -> impl Iterator<Item = PlayerPosition> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<PlayerPosition> for EligibilitySet {
    fn from_iter<T: IntoIterator<Item = PlayerPosition>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Maps a slot to its [`EligibilitySet`].
///
/// Starter labels are looked up case-insensitively. Bench and IR slots take
/// the reserve universe regardless of index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibilityResolver {
    table: IndexMap<String, EligibilitySet>,
    reserve: EligibilitySet,
    policy: UnknownSlotPolicy,
}

impl EligibilityResolver {
    pub fn new(rules: &RosterRules) -> Self {
        let table = rules
            .eligibility
            .iter()
            .map(|(label, positions)| (canonical_label(label), positions.iter().copied().collect()))
            .collect();

        Self {
            table,
            reserve: rules.reserve_positions.iter().copied().collect(),
            policy: rules.unknown_slot_policy,
        }
    }

    pub fn standard() -> Self {
        Self::new(&RosterRules::standard())
    }

    /// Whether the label has an entry in the eligibility table.
    pub fn is_known_label(&self, label: &str) -> bool {
        self.table.contains_key(&canonical_label(label))
    }

    /// Positions allowed to occupy `slot`.
    ///
    /// An unrecognized starter label yields the reserve universe under the
    /// permissive policy and the empty set under the strict one.
    pub fn eligible_positions(&self, slot: &RosterSlot) -> EligibilitySet {
        match self.lookup(slot) {
            Some(set) => set.clone(),
            None => match self.policy {
                UnknownSlotPolicy::Permissive => {
                    warn!(slot = %slot, "unknown slot label, allowing every position");
                    self.reserve.clone()
                }
                UnknownSlotPolicy::Strict => EligibilitySet::empty(),
            },
        }
    }

    pub fn is_eligible(&self, slot: &RosterSlot, position: PlayerPosition) -> bool {
        self.check(slot, position).is_ok()
    }

    /// Validate a placement of a `position` player into `slot`.
    pub fn check(&self, slot: &RosterSlot, position: PlayerPosition) -> Result<(), RosterError> {
        let allowed = match self.lookup(slot) {
            Some(set) => set.contains(position),
            None => match self.policy {
                UnknownSlotPolicy::Permissive => {
                    warn!(slot = %slot, %position, "unknown slot label, allowing placement");
                    self.reserve.contains(position)
                }
                UnknownSlotPolicy::Strict => {
                    return Err(RosterError::UnknownSlotType {
                        label: slot.position().unwrap_or_default().to_string(),
                    });
                }
            },
        };

        if allowed {
            Ok(())
        } else {
            Err(RosterError::PositionIneligible { position, slot: slot.clone() })
        }
    }

    fn lookup(&self, slot: &RosterSlot) -> Option<&EligibilitySet> {
        match slot.kind() {
            SlotKind::Bench | SlotKind::Ir => Some(&self.reserve),
            SlotKind::Starter => {
                let label = canonical_label(slot.position().unwrap_or_default());
                self.table.get(&label)
            }
        }
    }
}

impl Default for EligibilityResolver {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PlayerPosition::*;

    fn set(positions: &[PlayerPosition]) -> EligibilitySet {
        positions.iter().copied().collect()
    }

    #[test]
    fn test_single_position_slots() {
        let resolver = EligibilityResolver::standard();
        assert_eq!(resolver.eligible_positions(&RosterSlot::starter("QB", 1)), set(&[QB]));
        assert_eq!(resolver.eligible_positions(&RosterSlot::starter("rb", 2)), set(&[RB]));
        assert_eq!(resolver.eligible_positions(&RosterSlot::starter("WR", 1)), set(&[WR]));
        assert_eq!(resolver.eligible_positions(&RosterSlot::starter("TE", 1)), set(&[TE]));
        assert_eq!(resolver.eligible_positions(&RosterSlot::starter("K", 1)), set(&[K]));
        assert_eq!(resolver.eligible_positions(&RosterSlot::starter("DST", 1)), set(&[DST]));
        assert_eq!(resolver.eligible_positions(&RosterSlot::starter("def", 1)), set(&[DST]));
    }

    #[test]
    fn test_flex_slots() {
        let resolver = EligibilityResolver::standard();
        assert_eq!(resolver.eligible_positions(&RosterSlot::starter("FLEX", 1)), set(&[RB, WR, TE]));
        assert_eq!(
            resolver.eligible_positions(&RosterSlot::starter("SUPER_FLEX", 1)),
            set(&[QB, RB, WR, TE])
        );
        assert_eq!(
            resolver.eligible_positions(&RosterSlot::starter("superflex", 1)),
            set(&[QB, RB, WR, TE])
        );
        assert!(resolver.is_eligible(&RosterSlot::starter("FLEX", 1), TE));
        assert!(!resolver.is_eligible(&RosterSlot::starter("FLEX", 1), QB));
    }

    #[test]
    fn test_reserve_slots_take_every_position() {
        let resolver = EligibilityResolver::standard();
        for index in [1, 2, 9] {
            assert_eq!(resolver.eligible_positions(&RosterSlot::bench(index)), EligibilitySet::all());
            assert_eq!(resolver.eligible_positions(&RosterSlot::ir(index)), EligibilitySet::all());
        }
    }

    #[test]
    fn test_unknown_label_permissive() {
        let resolver = EligibilityResolver::standard();
        let slot = RosterSlot::starter("OP", 1);
        assert!(!resolver.is_known_label("OP"));
        assert_eq!(resolver.eligible_positions(&slot), EligibilitySet::all());
        assert!(resolver.check(&slot, K).is_ok());
    }

    #[test]
    fn test_unknown_label_strict() {
        let rules = RosterRules::standard().with_unknown_slot_policy(UnknownSlotPolicy::Strict);
        let resolver = EligibilityResolver::new(&rules);
        let slot = RosterSlot::starter("OP", 1);
        assert!(resolver.eligible_positions(&slot).is_empty());
        assert_eq!(
            resolver.check(&slot, QB),
            Err(RosterError::UnknownSlotType { label: "OP".to_string() })
        );
        // Known labels are unaffected
        assert!(resolver.check(&RosterSlot::starter("QB", 1), QB).is_ok());
    }

    #[test]
    fn test_check_reports_ineligible_position() {
        let resolver = EligibilityResolver::standard();
        let slot = RosterSlot::starter("WR", 1);
        assert_eq!(
            resolver.check(&slot, RB),
            Err(RosterError::PositionIneligible { position: RB, slot: slot.clone() })
        );
    }
}
