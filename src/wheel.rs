use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::SetlistError;

/// Number of slots on the Camelot wheel.
pub const WHEEL_SLOTS: u8 = 12;

/// Number of wheel positions a set traversal visits.
pub const PATH_LEN: usize = 6;

/// Slot offset between a major key and its relative minor.
const RELATIVE_KEY_OFFSET: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Minor,
    Major,
}

/// A position on the Camelot wheel: "1A".."12A" (minor) or "1B".."12B" (major).
///
/// Minor and major codes with the same number share a wheel slot; slot
/// arithmetic is zero-based (code number minus one).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CamelotKey {
    number: u8,
    mode: Mode,
}

impl CamelotKey {
    /// Parse a Camelot code, tolerating surrounding whitespace and lowercase
    /// letters. Returns None for anything outside "1A".."12B".
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim().to_ascii_uppercase();
        if trimmed.len() < 2 || !trimmed.is_ascii() {
            return None;
        }
        let (number_str, letter) = trimmed.split_at(trimmed.len() - 1);
        let mode = match letter {
            "A" => Mode::Minor,
            "B" => Mode::Major,
            _ => return None,
        };
        let number: u8 = number_str.parse().ok()?;
        if !(1..=WHEEL_SLOTS).contains(&number) {
            return None;
        }
        Some(CamelotKey { number, mode })
    }

    /// The minor key sitting at the given zero-based wheel slot.
    pub fn minor_at_slot(slot: u8) -> Self {
        CamelotKey {
            number: slot % WHEEL_SLOTS + 1,
            mode: Mode::Minor,
        }
    }

    /// Zero-based wheel slot (0..11).
    pub fn slot(self) -> u8 {
        self.number - 1
    }

    pub fn mode(self) -> Mode {
        self.mode
    }

    pub fn is_minor(self) -> bool {
        self.mode == Mode::Minor
    }

    /// The relative minor of a major key: three slots counter-clockwise.
    /// Minor keys are already minor and come back unchanged.
    pub fn relative_minor(self) -> Self {
        match self.mode {
            Mode::Minor => self,
            Mode::Major => {
                CamelotKey::minor_at_slot((self.slot() + WHEEL_SLOTS - RELATIVE_KEY_OFFSET) % WHEEL_SLOTS)
            }
        }
    }
}

impl fmt::Display for CamelotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self.mode {
            Mode::Minor => 'A',
            Mode::Major => 'B',
        };
        write!(f, "{}{}", self.number, letter)
    }
}

impl Serialize for CamelotKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for CamelotKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        CamelotKey::parse(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("'{s}' is not a recognized Camelot key")))
    }
}

impl JsonSchema for CamelotKey {
    fn schema_name() -> std::borrow::Cow<'static, str> {
        std::borrow::Cow::Borrowed("CamelotKey")
    }

    fn json_schema(_gen: &mut schemars::SchemaGenerator) -> schemars::Schema {
        schemars::json_schema!({
            "type": "string",
            "pattern": "^(1[0-2]|[1-9])[ABab]$",
            "description": "Camelot wheel position, e.g. '5A' (minor) or '12B' (major)"
        })
    }
}

/// Traversal direction around the wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Clockwise => "clockwise",
            Direction::CounterClockwise => "counter-clockwise",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "clockwise" => Some(Direction::Clockwise),
            "counter-clockwise" => Some(Direction::CounterClockwise),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The ordered six-position traversal a set is built around.
///
/// Positions are always minor keys; membership checks are a slot-indexed
/// table lookup rather than a scan.
#[derive(Debug, Clone)]
pub struct WheelPath {
    positions: [CamelotKey; PATH_LEN],
    position_by_slot: [Option<u8>; WHEEL_SLOTS as usize],
}

impl WheelPath {
    /// Path positions in traversal order.
    pub fn positions(&self) -> &[CamelotKey] {
        &self.positions
    }

    /// Traversal index of the position occupying the given wheel slot, if
    /// the path visits that slot.
    pub fn position_of_slot(&self, slot: u8) -> Option<usize> {
        self.position_by_slot[slot as usize % WHEEL_SLOTS as usize].map(usize::from)
    }
}

/// Generate the six-position traversal from a minor starting key.
///
/// The starting key must already be minor; the orchestration layer converts
/// major starts to their relative minor before calling.
pub fn generate_path(start: CamelotKey, direction: Direction) -> Result<WheelPath, SetlistError> {
    if !start.is_minor() {
        return Err(SetlistError::InvalidStartKey(start.to_string()));
    }

    let mut positions = [start; PATH_LEN];
    let mut position_by_slot = [None; WHEEL_SLOTS as usize];
    for (hop, position) in positions.iter_mut().enumerate() {
        let offset = hop as u8;
        let slot = match direction {
            Direction::Clockwise => (start.slot() + offset) % WHEEL_SLOTS,
            Direction::CounterClockwise => (start.slot() + WHEEL_SLOTS - offset) % WHEEL_SLOTS,
        };
        *position = CamelotKey::minor_at_slot(slot);
        position_by_slot[slot as usize] = Some(hop as u8);
    }

    Ok(WheelPath {
        positions,
        position_by_slot,
    })
}
