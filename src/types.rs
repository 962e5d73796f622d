use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::wheel::{CamelotKey, Direction};

/// Tempo field as it arrives from callers: tracklist exports carry strings,
/// JSON callers send numbers. Both forms deserialize.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum BpmField {
    Number(f64),
    Text(String),
}

impl BpmField {
    /// The tempo as a positive finite number, or None when the field is
    /// unusable (junk text, zero, negative, NaN).
    pub fn as_positive(&self) -> Option<f64> {
        let value = match self {
            BpmField::Number(value) => *value,
            BpmField::Text(raw) => raw.trim().parse::<f64>().ok()?,
        };
        (value.is_finite() && value > 0.0).then_some(value)
    }
}

impl JsonSchema for BpmField {
    fn schema_name() -> std::borrow::Cow<'static, str> {
        std::borrow::Cow::Borrowed("BpmField")
    }

    fn json_schema(_gen: &mut schemars::SchemaGenerator) -> schemars::Schema {
        schemars::json_schema!({
            "type": ["number", "string"],
            "description": "Tempo in BPM, as a number or a numeric string"
        })
    }
}

/// One track as supplied by the caller, before tempo validation.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct TrackRecord {
    #[schemars(description = "Artist name")]
    pub artist: String,
    #[schemars(description = "Track title")]
    pub title: String,
    #[schemars(description = "Camelot key code, e.g. '5A' or '12B'")]
    pub key: String,
    #[schemars(description = "Tempo in BPM — number or numeric string")]
    pub bpm: BpmField,
}

impl TrackRecord {
    /// Core-facing copy with the tempo parsed. None when the BPM field is
    /// unusable; such records are excluded from grouping, not an error.
    pub fn normalize(&self) -> Option<Track> {
        let bpm = self.bpm.as_positive()?;
        Some(Track {
            artist: self.artist.clone(),
            title: self.title.clone(),
            key: self.key.clone(),
            bpm,
        })
    }
}

/// A normalized track the core operates on. Never mutated; placements are
/// derived per request.
#[derive(Debug, Clone)]
pub struct Track {
    pub artist: String,
    pub title: String,
    pub key: String,
    pub bpm: f64,
}

/// Normalize caller records into core tracks, counting the records dropped
/// for unusable tempos.
pub fn normalize_records(records: &[TrackRecord]) -> (Vec<Track>, usize) {
    let mut tracks = Vec::with_capacity(records.len());
    let mut skipped = 0usize;
    for record in records {
        match record.normalize() {
            Some(track) => tracks.push(track),
            None => skipped += 1,
        }
    }
    (tracks, skipped)
}

/// One path position and the rendered labels of the tracks assigned to it.
/// Groups with no tracks still appear, preserving the six-group shape.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SetGroup {
    #[schemars(description = "Path position this group belongs to")]
    pub group: CamelotKey,
    #[schemars(description = "Rendered track labels, tempo-sorted ascending")]
    pub tracks: Vec<String>,
}

/// The finished set: starting key (minor form), traversal direction, and the
/// six groups in path order.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Setlist {
    pub starting_key: CamelotKey,
    pub direction: Direction,
    pub groups: Vec<SetGroup>,
}
