//! Tracklist file ingest: text decoding, separator and header detection,
//! row parsing, and starting-track lookup.
//!
//! Everything here is adapter territory. The core receives normalized
//! records and a resolved starting key/BPM; it never sees file bytes.

use std::fmt;

use crate::normalize;
use crate::types::{BpmField, TrackRecord};

/// Failure conditions while turning file bytes into track records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestError {
    /// File bytes are neither valid UTF-8 nor UTF-16.
    Undecodable,
    /// The header row lacks one or more required columns.
    MissingColumns(Vec<&'static str>),
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestError::Undecodable => {
                write!(f, "could not decode tracklist with UTF-8 or UTF-16")
            }
            IngestError::MissingColumns(missing) => {
                write!(f, "tracklist is missing required columns: {}", missing.join(", "))
            }
        }
    }
}

impl std::error::Error for IngestError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Artist,
    Title,
    Key,
    Bpm,
}

/// Map an export header cell onto one of the four columns the builder
/// needs. Rekordbox and Serato exports disagree on naming; all known
/// spellings funnel here.
fn canonical_column(header: &str) -> Option<Column> {
    match header.trim().to_lowercase().as_str() {
        "artist" => Some(Column::Artist),
        "track title" | "title" | "track" => Some(Column::Title),
        "key" | "musical key" => Some(Column::Key),
        "bpm" | "tempo" => Some(Column::Bpm),
        _ => None,
    }
}

/// Decode file bytes: UTF-8 first, then BOM-aware UTF-16 (little-endian
/// when no BOM is present).
fn decode_text(bytes: &[u8]) -> Option<String> {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return Some(text.trim_start_matches('\u{feff}').to_string());
    }

    if bytes.len() < 2 || bytes.len() % 2 != 0 {
        return None;
    }
    let (payload, big_endian) = match (bytes[0], bytes[1]) {
        (0xFF, 0xFE) => (&bytes[2..], false),
        (0xFE, 0xFF) => (&bytes[2..], true),
        _ => (bytes, false),
    };
    let units: Vec<u16> = payload
        .chunks_exact(2)
        .map(|pair| {
            if big_endian {
                u16::from_be_bytes([pair[0], pair[1]])
            } else {
                u16::from_le_bytes([pair[0], pair[1]])
            }
        })
        .collect();
    String::from_utf16(&units).ok()
}

/// Split one row on the separator, honoring double-quoted cells so comma
/// exports with quoted titles survive.
fn split_row(line: &str, sep: char) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(ch);
            }
        } else if ch == '"' && current.is_empty() {
            in_quotes = true;
        } else if ch == sep {
            cells.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }
    cells.push(current);
    cells
}

/// Parse an exported tracklist (CSV or TSV) into caller records.
///
/// Separator detection follows the exports themselves: any tab in the text
/// means tab-separated, otherwise comma. Rows missing any of the four
/// required cells are skipped.
pub fn parse_tracklist(contents: &[u8]) -> Result<Vec<TrackRecord>, IngestError> {
    let text = decode_text(contents).ok_or(IngestError::Undecodable)?;
    let sep = if text.contains('\t') { '\t' } else { ',' };

    let mut lines = text.lines().filter(|line| !line.trim().is_empty());
    let header_line = lines.next().unwrap_or("");
    let headers = split_row(header_line, sep);

    let mut artist_idx = None;
    let mut title_idx = None;
    let mut key_idx = None;
    let mut bpm_idx = None;
    for (idx, header) in headers.iter().enumerate() {
        let slot = match canonical_column(header) {
            Some(Column::Artist) => &mut artist_idx,
            Some(Column::Title) => &mut title_idx,
            Some(Column::Key) => &mut key_idx,
            Some(Column::Bpm) => &mut bpm_idx,
            None => continue,
        };
        // First matching header wins.
        if slot.is_none() {
            *slot = Some(idx);
        }
    }

    let mut missing = Vec::new();
    if artist_idx.is_none() {
        missing.push("artist");
    }
    if title_idx.is_none() {
        missing.push("title");
    }
    if key_idx.is_none() {
        missing.push("key");
    }
    if bpm_idx.is_none() {
        missing.push("bpm");
    }
    if !missing.is_empty() {
        return Err(IngestError::MissingColumns(missing));
    }
    let (artist_idx, title_idx, key_idx, bpm_idx) = (
        artist_idx.unwrap_or(0),
        title_idx.unwrap_or(0),
        key_idx.unwrap_or(0),
        bpm_idx.unwrap_or(0),
    );

    let mut records = Vec::new();
    for line in lines {
        let cells = split_row(line, sep);
        let cell = |idx: usize| {
            cells
                .get(idx)
                .map(|raw| raw.trim())
                .filter(|trimmed| !trimmed.is_empty())
        };
        let (Some(artist), Some(title), Some(key), Some(bpm)) =
            (cell(artist_idx), cell(title_idx), cell(key_idx), cell(bpm_idx))
        else {
            continue;
        };
        records.push(TrackRecord {
            artist: artist.to_string(),
            title: title.to_string(),
            key: key.to_string(),
            bpm: BpmField::Text(bpm.to_string()),
        });
    }
    Ok(records)
}

/// First record whose "artist – title" pair fuzzy-matches the selector.
pub fn find_starting_track<'a>(
    records: &'a [TrackRecord],
    selector: &str,
) -> Option<&'a TrackRecord> {
    records
        .iter()
        .find(|record| normalize::selector_matches(&record.artist, &record.title, selector))
}
