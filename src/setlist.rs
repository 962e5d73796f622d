use crate::compat::{self, Placement, Shift};
use crate::error::SetlistError;
use crate::types::{SetGroup, Setlist, Track};
use crate::wheel::{self, CamelotKey, Direction, PATH_LEN, WheelPath};

/// BPM distance from the starting track under which an ambiguous track
/// prefers the earlier path position over the later one.
const NEAR_TEMPO_MARGIN: f64 = 2.0;

/// Count tracks that resolve to exactly one path position. Tracks that
/// reach two positions are deliberately not evidence for either direction.
fn unambiguous_count(tracks: &[Track], path: &WheelPath) -> usize {
    tracks
        .iter()
        .filter(|track| compat::resolve(&track.key, path).len() == 1)
        .count()
}

/// Unambiguous-compatible track counts for (clockwise, counter-clockwise)
/// traversals from the given minor start.
pub fn direction_counts(
    tracks: &[Track],
    start: CamelotKey,
) -> Result<(usize, usize), SetlistError> {
    let clockwise = wheel::generate_path(start, Direction::Clockwise)?;
    let counter_clockwise = wheel::generate_path(start, Direction::CounterClockwise)?;
    Ok((
        unambiguous_count(tracks, &clockwise),
        unambiguous_count(tracks, &counter_clockwise),
    ))
}

/// The direction whose traversal fits more tracks. Clockwise wins ties.
pub fn direction_for_counts(clockwise: usize, counter_clockwise: usize) -> Direction {
    if clockwise >= counter_clockwise {
        Direction::Clockwise
    } else {
        Direction::CounterClockwise
    }
}

/// Pick a traversal direction for the collection from a minor start.
pub fn choose_direction(tracks: &[Track], start: CamelotKey) -> Result<Direction, SetlistError> {
    let (clockwise, counter_clockwise) = direction_counts(tracks, start)?;
    Ok(direction_for_counts(clockwise, counter_clockwise))
}

/// A track committed to a path position.
struct Placed<'a> {
    track: &'a Track,
    key: CamelotKey,
    shift: Option<Shift>,
}

/// A track that reached two path positions, held back until every
/// unambiguous track has been placed.
struct Deferred<'a> {
    track: &'a Track,
    key: CamelotKey,
    earlier: Placement,
    later: Placement,
}

fn render_label(placed: &Placed<'_>) -> String {
    match placed.shift {
        None => format!(
            "{} – {} ({}) – {:.1} BPM",
            placed.track.artist, placed.track.title, placed.key, placed.track.bpm
        ),
        Some(shift) => format!(
            "{} – {} (from {}) – {:.1} BPM ({})",
            placed.track.artist,
            placed.track.title,
            placed.key,
            placed.track.bpm,
            shift.describe()
        ),
    }
}

/// Assign every resolvable track to exactly one path position and render
/// the groups in traversal order.
///
/// Unambiguous tracks are placed first; two-position tracks then resolve in
/// encounter order against the group sizes visible at that moment, each
/// decision committing immediately. Tracks with unrecognized or unreachable
/// keys are dropped from the output.
pub fn group_tracks(tracks: &[Track], path: &WheelPath, start_bpm: f64) -> Vec<SetGroup> {
    let mut originals: [Vec<Placed<'_>>; PATH_LEN] = std::array::from_fn(|_| Vec::new());
    let mut shifted: [Vec<Placed<'_>>; PATH_LEN] = std::array::from_fn(|_| Vec::new());
    let mut deferred: Vec<Deferred<'_>> = Vec::new();

    for track in tracks {
        let Some(key) = CamelotKey::parse(&track.key) else {
            continue;
        };
        let placements = compat::resolve_key(key, path);
        match placements.as_slice() {
            [] => {}
            [only] => {
                let placed = Placed {
                    track,
                    key,
                    shift: only.shift,
                };
                match only.shift {
                    None => originals[only.position].push(placed),
                    Some(_) => shifted[only.position].push(placed),
                }
            }
            [earlier, later, ..] => deferred.push(Deferred {
                track,
                key,
                earlier: *earlier,
                later: *later,
            }),
        }
    }

    for pending in deferred {
        let earlier_size =
            originals[pending.earlier.position].len() + shifted[pending.earlier.position].len();
        let later_size =
            originals[pending.later.position].len() + shifted[pending.later.position].len();

        let chosen = if earlier_size != later_size {
            if earlier_size < later_size {
                pending.earlier
            } else {
                pending.later
            }
        } else if pending.track.bpm <= start_bpm + NEAR_TEMPO_MARGIN {
            pending.earlier
        } else {
            pending.later
        };

        shifted[chosen.position].push(Placed {
            track: pending.track,
            key: pending.key,
            shift: chosen.shift,
        });
    }

    path.positions()
        .iter()
        .enumerate()
        .map(|(position, group_key)| {
            let mut merged: Vec<Placed<'_>> = Vec::new();
            merged.append(&mut originals[position]);
            merged.append(&mut shifted[position]);
            // Stable sort: equal tempos keep encounter order.
            merged.sort_by(|a, b| {
                a.track
                    .bpm
                    .partial_cmp(&b.track.bpm)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            SetGroup {
                group: *group_key,
                tracks: merged.iter().map(render_label).collect(),
            }
        })
        .collect()
}

/// Build the full set from normalized tracks and a resolved starting track.
///
/// The starting key may be major; it is converted to its relative minor and
/// reported in that form. When no direction is requested, the one fitting
/// more tracks is selected.
pub fn build_setlist(
    tracks: &[Track],
    start_key: &str,
    start_bpm: f64,
    requested: Option<Direction>,
) -> Result<Setlist, SetlistError> {
    let start = CamelotKey::parse(start_key)
        .ok_or_else(|| SetlistError::InvalidStartKey(start_key.trim().to_string()))?
        .relative_minor();

    if !start_bpm.is_finite() || start_bpm <= 0.0 {
        return Err(SetlistError::UnparseableTempo(format!(
            "starting track BPM must be a positive number, got {start_bpm}"
        )));
    }

    let direction = match requested {
        Some(direction) => direction,
        None => choose_direction(tracks, start)?,
    };
    let path = wheel::generate_path(start, direction)?;
    let groups = group_tracks(tracks, &path, start_bpm);

    Ok(Setlist {
        starting_key: start,
        direction,
        groups,
    })
}
