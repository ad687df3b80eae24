use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::slot::{canonical_label, RosterSlot, SlotKind};
use crate::error::ConfigError;

/// Most slots one starter label, the bench or IR may hold.
pub const MAX_SLOTS_PER_GROUP: u32 = 99;
/// Most slots a whole layout may hold.
pub const MAX_TOTAL_SLOTS: u32 = 200;

/// Wire shape of a roster layout, as sent by team-creation requests.
///
/// Counts are signed so that a negative count reaches validation instead of
/// failing deep inside the JSON parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterPositions {
    pub starters: IndexMap<String, i64>,
    pub bench: i64,
    #[serde(default)]
    pub ir: i64,
}

/// Immutable slot layout of a team: starter counts per position label,
/// bench size and IR size.
///
/// Starter labels are canonical (upper-case). Their order is the order the
/// layout was written in; slot enumeration follows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RosterPositions", into = "RosterPositions")]
pub struct RosterConfiguration {
    starters: IndexMap<String, u32>,
    bench: u32,
    ir: u32,
}

impl RosterConfiguration {
    /// Build a configuration. Labels are canonicalized; two labels that
    /// collide after canonicalization are rejected, as is any count above
    /// [`MAX_SLOTS_PER_GROUP`] or a layout above [`MAX_TOTAL_SLOTS`].
    pub fn new<I, L>(starters: I, bench: u32, ir: u32) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (L, u32)>,
        L: AsRef<str>,
    {
        let mut map = IndexMap::new();
        for (label, count) in starters {
            let label = canonical_label(label.as_ref());
            check_group(&label, count)?;
            if map.insert(label.clone(), count).is_some() {
                return Err(ConfigError::DuplicatePosition { position: label });
            }
        }
        check_group("bench", bench)?;
        check_group("ir", ir)?;

        // Each group is capped, so u64 cannot overflow here
        let total: u64 = map.values().map(|c| u64::from(*c)).sum::<u64>() + u64::from(bench) + u64::from(ir);
        if total > u64::from(MAX_TOTAL_SLOTS) {
            return Err(ConfigError::TooManySlots { total, max: MAX_TOTAL_SLOTS });
        }

        Ok(Self { starters: map, bench, ir })
    }

    /// Default layout offered by team creation: QB, 2 RB, 2 WR, TE, FLEX,
    /// K, DST, six bench spots and one IR spot.
    pub fn standard() -> Self {
        let starters = [("QB", 1), ("RB", 2), ("WR", 2), ("TE", 1), ("FLEX", 1), ("K", 1), ("DST", 1)]
            .into_iter()
            .map(|(label, count)| (label.to_string(), count))
            .collect();
        Self { starters, bench: 6, ir: 1 }
    }

    /// Starter labels and counts, in configuration order.
    pub fn starters(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.starters.iter().map(|(label, count)| (label.as_str(), *count))
    }

    pub fn starter_count(&self, position: &str) -> u32 {
        self.starters.get(&canonical_label(position)).copied().unwrap_or(0)
    }

    pub fn bench(&self) -> u32 {
        self.bench
    }

    pub fn ir(&self) -> u32 {
        self.ir
    }

    pub fn starter_slot_count(&self) -> u32 {
        self.starters.values().sum()
    }

    /// Number of slots the layout defines: starters + bench + IR.
    pub fn total_slots(&self) -> u32 {
        self.starter_slot_count() + self.bench + self.ir
    }

    /// How many slots exist for this kind (and starter position).
    pub fn count_for(&self, kind: SlotKind, position: Option<&str>) -> u32 {
        match kind {
            SlotKind::Starter => position.map(|p| self.starter_count(p)).unwrap_or(0),
            SlotKind::Bench => self.bench,
            SlotKind::Ir => self.ir,
        }
    }

    /// Whether the slot exists under this layout.
    pub fn contains(&self, slot: &RosterSlot) -> bool {
        let count = self.count_for(slot.kind(), slot.position());
        (1..=count).contains(&slot.index())
    }
}

fn check_group(field: &str, count: u32) -> Result<(), ConfigError> {
    if count > MAX_SLOTS_PER_GROUP {
        return Err(ConfigError::SlotCountTooLarge {
            field: field.to_string(),
            count: u64::from(count),
            max: MAX_SLOTS_PER_GROUP,
        });
    }
    Ok(())
}

impl TryFrom<RosterPositions> for RosterConfiguration {
    type Error = ConfigError;

    fn try_from(raw: RosterPositions) -> Result<Self, Self::Error> {
        fn non_negative(field: &str, count: i64) -> Result<u32, ConfigError> {
            if count < 0 {
                return Err(ConfigError::NegativeCount { field: field.to_string(), count });
            }
            u32::try_from(count).map_err(|_| ConfigError::SlotCountTooLarge {
                field: field.to_string(),
                count: count.unsigned_abs(),
                max: MAX_SLOTS_PER_GROUP,
            })
        }

        let mut starters = Vec::with_capacity(raw.starters.len());
        for (label, count) in &raw.starters {
            starters.push((label.as_str(), non_negative(label, *count)?));
        }
        let bench = non_negative("bench", raw.bench)?;
        let ir = non_negative("ir", raw.ir)?;

        RosterConfiguration::new(starters, bench, ir)
    }
}

impl From<RosterConfiguration> for RosterPositions {
    fn from(config: RosterConfiguration) -> Self {
        Self {
            starters: config
                .starters
                .into_iter()
                .map(|(label, count)| (label, i64::from(count)))
                .collect(),
            bench: i64::from(config.bench),
            ir: i64::from(config.ir),
        }
    }
}

impl Default for RosterConfiguration {
    fn default() -> Self {
        Self::standard()
    }
}
