use crate::wheel::{CamelotKey, Mode, WHEEL_SLOTS, WheelPath};

/// Clockwise slot distance a semitone-down shift bridges.
const SEMITONE_DOWN_DELTA: u8 = 5;
/// Clockwise slot distance a semitone-up shift bridges.
const SEMITONE_UP_DELTA: u8 = 7;

/// Transformation that makes an off-path track fit a path position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shift {
    SemitoneDown,
    SemitoneUp,
    ModeShift,
}

impl Shift {
    /// Human-readable form used in rendered track labels.
    pub fn describe(self) -> &'static str {
        match self {
            Shift::SemitoneDown => "-1 semitone shift",
            Shift::SemitoneUp => "+1 semitone shift",
            Shift::ModeShift => "mode shift",
        }
    }
}

/// A path position a track can be mapped to, and the transformation (if any)
/// required to get it there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Traversal index into the path.
    pub position: usize,
    /// The path position itself.
    pub target: CamelotKey,
    /// None for a direct key match.
    pub shift: Option<Shift>,
}

/// Resolve a raw key string against a path. Unrecognized codes yield no
/// placements, which drops the track from the output.
pub fn resolve(raw_key: &str, path: &WheelPath) -> Vec<Placement> {
    match CamelotKey::parse(raw_key) {
        Some(key) => resolve_key(key, path),
        None => Vec::new(),
    }
}

/// Resolve a parsed key against a path.
///
/// A minor key already on the path maps directly and exclusively to its own
/// position. A minor key off the path is checked against every position for
/// the two semitone-bridgeable slot distances; at most two positions of a
/// six-long path can qualify. A major key fits only via its relative minor,
/// as a mode shift.
pub fn resolve_key(key: CamelotKey, path: &WheelPath) -> Vec<Placement> {
    match key.mode() {
        Mode::Minor => {
            if let Some(position) = path.position_of_slot(key.slot()) {
                return vec![Placement {
                    position,
                    target: path.positions()[position],
                    shift: None,
                }];
            }

            let mut placements = Vec::new();
            for (position, target) in path.positions().iter().enumerate() {
                let delta = (target.slot() + WHEEL_SLOTS - key.slot()) % WHEEL_SLOTS;
                let shift = match delta {
                    SEMITONE_DOWN_DELTA => Shift::SemitoneDown,
                    SEMITONE_UP_DELTA => Shift::SemitoneUp,
                    _ => continue,
                };
                placements.push(Placement {
                    position,
                    target: *target,
                    shift: Some(shift),
                });
            }
            placements
        }
        Mode::Major => {
            let relative = key.relative_minor();
            match path.position_of_slot(relative.slot()) {
                Some(position) => vec![Placement {
                    position,
                    target: path.positions()[position],
                    shift: Some(Shift::ModeShift),
                }],
                None => Vec::new(),
            }
        }
    }
}
