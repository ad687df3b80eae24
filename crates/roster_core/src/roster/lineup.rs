//! Display ordering of a team's lineup.
//!
//! Starters are ranked by `base_order(label) * multiplier + index`, so all
//! sub-slots of one label (RB1, RB2) sit together ahead of the next label.
//! Labels without a priority share the fallback bucket and keep their
//! configuration order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::assignment::RosterAssignment;
use crate::config::{LineupRules, RosterRules};
use crate::models::{canonical_label, RosterConfiguration, RosterSlot, SlotKind};

/// One displayed line of a lineup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineupRow {
    pub slot: RosterSlot,
    /// "QB", "RB2", "BN3", ...
    pub label: String,
    pub player_id: Option<String>,
    pub sort_order: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineupOrderer {
    priorities: IndexMap<String, u32>,
    fallback_order: u32,
    multiplier: u32,
}

impl LineupOrderer {
    pub fn new(rules: &LineupRules) -> Self {
        Self {
            priorities: rules
                .priorities
                .iter()
                .map(|(label, order)| (canonical_label(label), *order))
                .collect(),
            fallback_order: rules.fallback_order,
            multiplier: rules.sub_slot_multiplier,
        }
    }

    pub fn standard() -> Self {
        Self::new(&RosterRules::standard().lineup)
    }

    /// Priority bucket of a starter label.
    pub fn base_order(&self, label: &str) -> u32 {
        self.priorities.get(&canonical_label(label)).copied().unwrap_or(self.fallback_order)
    }

    pub fn sort_order(&self, label: &str, index: u32) -> u32 {
        self.base_order(label).saturating_mul(self.multiplier).saturating_add(index)
    }

    /// Starter rows in display order, each with its occupant (if any).
    pub fn ordered_starter_slots(&self, config: &RosterConfiguration, assignment: &RosterAssignment) -> Vec<LineupRow> {
        let mut rows: Vec<LineupRow> = config
            .starters()
            .flat_map(move |(label, count)| {
                (1..=count).map(move |index| {
                    let slot = RosterSlot::starter(label, index);
                    LineupRow {
                        label: if count > 1 { format!("{}{}", label, index) } else { label.to_string() },
                        player_id: assignment.get(&slot).map(str::to_string),
                        sort_order: self.sort_order(label, index),
                        slot,
                    }
                })
            })
            .collect();

        // Stable: equal keys keep configuration order
        rows.sort_by_key(|row| row.sort_order);
        rows
    }

    pub fn bench_rows(&self, config: &RosterConfiguration, assignment: &RosterAssignment) -> Vec<LineupRow> {
        reserve_rows(SlotKind::Bench, config.bench(), assignment)
    }

    pub fn ir_rows(&self, config: &RosterConfiguration, assignment: &RosterAssignment) -> Vec<LineupRow> {
        reserve_rows(SlotKind::Ir, config.ir(), assignment)
    }
}

impl Default for LineupOrderer {
    fn default() -> Self {
        Self::standard()
    }
}

fn reserve_rows(kind: SlotKind, count: u32, assignment: &RosterAssignment) -> Vec<LineupRow> {
    (1..=count)
        .map(|index| {
            let slot = RosterSlot::new(kind, None, index);
            LineupRow {
                label: slot.to_string(),
                player_id: assignment.get(&slot).map(str::to_string),
                sort_order: index,
                slot,
            }
        })
        .collect()
}
