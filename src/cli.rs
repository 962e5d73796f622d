use std::path::PathBuf;

use clap::Parser;

use crate::error::SetlistError;
use crate::ingest;
use crate::setlist;
use crate::types::{self, Setlist};
use crate::wheel::Direction;

#[derive(Parser)]
#[command(name = "camflow")]
enum Cli {
    /// Build a harmonically ordered set list from a tracklist export
    Build(BuildArgs),
}

#[derive(clap::Args)]
pub struct BuildArgs {
    /// Tracklist file (CSV or TSV export with artist/title/key/bpm columns)
    pub file: PathBuf,
    /// Starting track selector, matched against "artist – title"
    #[arg(long)]
    pub starting_track: Option<String>,
    /// Explicit starting key (Camelot code) — alternative to --starting-track
    #[arg(long)]
    pub start_key: Option<String>,
    /// Starting track BPM — required with --start-key
    #[arg(long)]
    pub start_bpm: Option<f64>,
    /// Traversal direction ("clockwise" or "counter-clockwise"); auto-selected when omitted
    #[arg(long)]
    pub direction: Option<String>,
    /// Emit JSON instead of the human-readable listing
    #[arg(long)]
    pub json: bool,
}

pub fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    match cli {
        Cli::Build(args) => build(args),
    }
}

fn parse_direction_arg(raw: &str) -> Result<Direction, String> {
    Direction::parse(raw)
        .ok_or_else(|| format!("unknown direction '{raw}' (expected 'clockwise' or 'counter-clockwise')"))
}

/// Read, ingest, resolve the start, and run the core. Split from printing
/// so the flow is testable end to end.
fn build_setlist_from_file(args: &BuildArgs) -> Result<Setlist, Box<dyn std::error::Error>> {
    let contents = std::fs::read(&args.file)?;
    let records = ingest::parse_tracklist(&contents)?;
    let (tracks, skipped) = types::normalize_records(&records);
    eprintln!(
        "Parsed {} tracks from {} ({} skipped: unparseable BPM)",
        tracks.len(),
        args.file.display(),
        skipped
    );

    let (start_key, start_bpm) = if let Some(ref selector) = args.starting_track {
        let record = ingest::find_starting_track(&records, selector)
            .ok_or("Starting track not found.")?;
        let bpm = record.bpm.as_positive().ok_or_else(|| {
            SetlistError::UnparseableTempo(format!(
                "starting track '{} – {}' has no usable BPM",
                record.artist, record.title
            ))
        })?;
        (record.key.clone(), bpm)
    } else if let (Some(key), Some(bpm)) = (args.start_key.as_ref(), args.start_bpm) {
        (key.clone(), bpm)
    } else {
        return Err("Provide --starting-track, or --start-key with --start-bpm.".into());
    };

    let direction = args
        .direction
        .as_deref()
        .map(parse_direction_arg)
        .transpose()?;

    Ok(setlist::build_setlist(&tracks, &start_key, start_bpm, direction)?)
}

fn render_setlist(setlist: &Setlist) -> String {
    let mut out = String::new();
    out.push_str(&format!("Starting key: {}\n", setlist.starting_key));
    out.push_str(&format!("Direction: {}\n", setlist.direction));
    for group in &setlist.groups {
        out.push_str(&format!("\n[{}]\n", group.group));
        if group.tracks.is_empty() {
            out.push_str("  (no tracks)\n");
        } else {
            for (index, label) in group.tracks.iter().enumerate() {
                out.push_str(&format!("  {}. {}\n", index + 1, label));
            }
        }
    }
    out
}

fn build(args: BuildArgs) -> Result<(), Box<dyn std::error::Error>> {
    let setlist = build_setlist_from_file(&args)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&setlist)?);
    } else {
        print!("{}", render_setlist(&setlist));
    }
    Ok(())
}
