//! Roster slot identity.
//!
//! A slot is the triple `(kind, position, index)`. Bench and IR slots carry
//! no position; starter positions are stored in canonical form (trimmed,
//! upper-case), so two slots are the same slot iff the triples match.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Marker used in place of a position in the identity key of bench/IR slots.
pub const RESERVE_MARKER: &str = "-";

/// Canonical form of a slot or position label.
pub fn canonical_label(label: &str) -> String {
    label.trim().to_ascii_uppercase()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotKind {
    Starter,
    Bench,
    Ir,
}

impl SlotKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotKind::Starter => "starter",
            SlotKind::Bench => "bench",
            SlotKind::Ir => "ir",
        }
    }

    /// Short label prefix used for reserve slots ("BN3", "IR1").
    pub fn reserve_prefix(&self) -> Option<&'static str> {
        match self {
            SlotKind::Starter => None,
            SlotKind::Bench => Some("BN"),
            SlotKind::Ir => Some("IR"),
        }
    }
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An addressable place on a roster that holds at most one player.
///
/// Serialized as `{"type": "starter", "position": "RB", "index": 2}`; the
/// position key is omitted for bench and IR slots.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "RawRosterSlot")]
pub struct RosterSlot {
    #[serde(rename = "type")]
    kind: SlotKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    position: Option<String>,
    index: u32,
}

#[derive(Deserialize)]
struct RawRosterSlot {
    #[serde(rename = "type")]
    kind: SlotKind,
    #[serde(default)]
    position: Option<String>,
    index: u32,
}

impl From<RawRosterSlot> for RosterSlot {
    fn from(raw: RawRosterSlot) -> Self {
        RosterSlot::new(raw.kind, raw.position.as_deref(), raw.index)
    }
}

impl RosterSlot {
    /// Build a slot, normalizing it to canonical form.
    ///
    /// The position is dropped for bench/IR slots. A starter slot without a
    /// position gets an empty label, which no configuration contains.
    pub fn new(kind: SlotKind, position: Option<&str>, index: u32) -> Self {
        let position = match kind {
            SlotKind::Starter => Some(position.map(canonical_label).unwrap_or_default()),
            SlotKind::Bench | SlotKind::Ir => None,
        };
        Self { kind, position, index }
    }

    pub fn starter(position: impl AsRef<str>, index: u32) -> Self {
        Self::new(SlotKind::Starter, Some(position.as_ref()), index)
    }

    pub fn bench(index: u32) -> Self {
        Self::new(SlotKind::Bench, None, index)
    }

    pub fn ir(index: u32) -> Self {
        Self::new(SlotKind::Ir, None, index)
    }

    pub fn kind(&self) -> SlotKind {
        self.kind
    }

    /// Starter position label; `None` for bench and IR.
    pub fn position(&self) -> Option<&str> {
        self.position.as_deref()
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn is_starter(&self) -> bool {
        self.kind == SlotKind::Starter
    }

    /// Identity triple. Bench/IR slots use [`RESERVE_MARKER`] as position.
    pub fn key(&self) -> (SlotKind, &str, u32) {
        (self.kind, self.position().unwrap_or(RESERVE_MARKER), self.index)
    }
}

impl fmt::Display for RosterSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.position, self.kind.reserve_prefix()) {
            (Some(position), _) => write!(f, "{}{}", position, self.index),
            (None, Some(prefix)) => write!(f, "{}{}", prefix, self.index),
            (None, None) => write!(f, "{}{}", self.kind, self.index),
        }
    }
}

/// Parses the short slot notation: `QB`, `RB2`, `SUPER_FLEX1`, `BN3`, `IR1`.
///
/// A missing index means 1. `BN`/`BENCH` and `IR` prefixes select reserve
/// slots; anything else is a starter label.
impl FromStr for RosterSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let spec = canonical_label(s);
        if spec.is_empty() {
            return Err("empty slot spec".to_string());
        }

        let label = spec.trim_end_matches(|c: char| c.is_ascii_digit());
        let digits = &spec[label.len()..];
        if label.is_empty() {
            return Err(format!("slot spec '{}' has no label", s.trim()));
        }

        let index = if digits.is_empty() {
            1
        } else {
            digits.parse::<u32>().map_err(|e| format!("invalid slot index in '{}': {}", s.trim(), e))?
        };

        Ok(match label {
            "BN" | "BENCH" => RosterSlot::bench(index),
            "IR" => RosterSlot::ir(index),
            _ => RosterSlot::starter(label, index),
        })
    }
}
