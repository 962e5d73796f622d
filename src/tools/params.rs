use schemars::JsonSchema;
use serde::Deserialize;

use crate::types::TrackRecord;
use crate::wheel::Direction;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct BuildSetParams {
    #[schemars(description = "Track records to arrange: artist, title, key (Camelot code), bpm")]
    pub tracks: Vec<TrackRecord>,
    #[schemars(
        description = "Fuzzy selector for the starting track, matched against 'artist – title' (case-insensitive substring)"
    )]
    pub starting_track: Option<String>,
    #[schemars(
        description = "Explicit starting key (Camelot code, e.g. '5A' or '12B') — alternative to starting_track"
    )]
    pub start_key: Option<String>,
    #[schemars(description = "Starting track BPM — required with start_key")]
    pub start_bpm: Option<f64>,
    #[schemars(
        description = "Traversal direction: 'clockwise' or 'counter-clockwise' (auto-selected when omitted)"
    )]
    pub direction: Option<Direction>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ChooseDirectionParams {
    #[schemars(description = "Track records to evaluate: artist, title, key (Camelot code), bpm")]
    pub tracks: Vec<TrackRecord>,
    #[schemars(
        description = "Fuzzy selector for the starting track, matched against 'artist – title' (case-insensitive substring)"
    )]
    pub starting_track: Option<String>,
    #[schemars(
        description = "Explicit starting key (Camelot code, e.g. '5A' or '12B') — alternative to starting_track"
    )]
    pub start_key: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GeneratePathParams {
    #[schemars(description = "Starting key (Camelot code); major keys convert to their relative minor")]
    pub start_key: String,
    #[schemars(description = "Traversal direction: 'clockwise' or 'counter-clockwise'")]
    pub direction: Direction,
}
