use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, ServerCapabilities, ServerInfo};
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};

mod params;

use params::*;

use crate::error::SetlistError;
use crate::ingest;
use crate::setlist;
use crate::types::{self, TrackRecord};
use crate::wheel::{self, CamelotKey};

fn internal(msg: String) -> McpError {
    McpError::internal_error(msg, None)
}

fn invalid(msg: String) -> McpError {
    McpError::invalid_params(msg, None)
}

/// Starting key and tempo as resolved from tool parameters, before the core
/// validates them.
struct ResolvedStart {
    key: String,
    bpm: Option<f64>,
}

/// Resolve the starting track from either a fuzzy selector or an explicit
/// key. Selectors run against the raw records so a starting track with a
/// broken BPM is caught as a fatal error rather than silently skipped.
fn resolve_start(
    records: &[TrackRecord],
    starting_track: Option<&str>,
    start_key: Option<&str>,
    start_bpm: Option<f64>,
) -> Result<ResolvedStart, McpError> {
    if let Some(selector) = starting_track {
        let record = ingest::find_starting_track(records, selector).ok_or_else(|| {
            invalid(format!("Starting track not found for selector '{selector}'"))
        })?;
        return Ok(ResolvedStart {
            key: record.key.clone(),
            bpm: record.bpm.as_positive(),
        });
    }
    match start_key {
        Some(key) => Ok(ResolvedStart {
            key: key.to_string(),
            bpm: start_bpm,
        }),
        None => Err(invalid(
            "Either starting_track or start_key must be provided".to_string(),
        )),
    }
}

fn core_error(error: SetlistError) -> McpError {
    // Both kinds are caller-input problems, not server faults.
    invalid(error.to_string())
}

#[derive(Clone)]
pub struct CamflowServer {
    tool_router: ToolRouter<Self>,
}

impl Default for CamflowServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_router]
impl CamflowServer {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        description = "Build a harmonically ordered DJ set: pick a Camelot wheel traversal from the starting track, group every compatible track into one of six positions, and flag semitone or mode shifts. Tracks with unrecognized keys are dropped."
    )]
    async fn build_set(
        &self,
        params: Parameters<BuildSetParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let (tracks, skipped) = types::normalize_records(&p.tracks);

        let start = resolve_start(
            &p.tracks,
            p.starting_track.as_deref(),
            p.start_key.as_deref(),
            p.start_bpm,
        )?;
        let start_bpm = start.bpm.ok_or_else(|| {
            core_error(SetlistError::UnparseableTempo(
                "starting track BPM is missing or not a positive number".to_string(),
            ))
        })?;

        let setlist =
            setlist::build_setlist(&tracks, &start.key, start_bpm, p.direction).map_err(core_error)?;

        let mut result = serde_json::to_value(&setlist).map_err(|e| internal(format!("{e}")))?;
        if skipped > 0 {
            result["skipped_tracks"] = serde_json::json!(skipped);
        }
        let json = serde_json::to_string_pretty(&result).map_err(|e| internal(format!("{e}")))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(
        description = "Count how many tracks fit each traversal direction from a starting key and report the winner (clockwise wins ties). Ambiguous two-position tracks count for neither direction."
    )]
    async fn choose_direction(
        &self,
        params: Parameters<ChooseDirectionParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let (tracks, _) = types::normalize_records(&p.tracks);

        let start = resolve_start(
            &p.tracks,
            p.starting_track.as_deref(),
            p.start_key.as_deref(),
            None,
        )?;
        let start_key = CamelotKey::parse(&start.key)
            .ok_or_else(|| core_error(SetlistError::InvalidStartKey(start.key.clone())))?
            .relative_minor();

        let (clockwise, counter_clockwise) =
            setlist::direction_counts(&tracks, start_key).map_err(core_error)?;
        let direction = setlist::direction_for_counts(clockwise, counter_clockwise);

        let result = serde_json::json!({
            "start_key": start_key,
            "clockwise_count": clockwise,
            "counter_clockwise_count": counter_clockwise,
            "direction": direction,
        });
        let json = serde_json::to_string_pretty(&result).map_err(|e| internal(format!("{e}")))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(
        description = "List the six Camelot wheel positions a traversal visits from a starting key in the given direction. Major starting keys convert to their relative minor first."
    )]
    async fn generate_path(
        &self,
        params: Parameters<GeneratePathParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let start = CamelotKey::parse(&p.start_key)
            .ok_or_else(|| core_error(SetlistError::InvalidStartKey(p.start_key.clone())))?
            .relative_minor();
        let path = wheel::generate_path(start, p.direction).map_err(core_error)?;

        let result = serde_json::json!({
            "start_key": start,
            "direction": p.direction,
            "path": path.positions(),
        });
        let json = serde_json::to_string_pretty(&result).map_err(|e| internal(format!("{e}")))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

#[tool_handler]
impl ServerHandler for CamflowServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Harmonic DJ set builder. Arrange a track collection around the \
                 Camelot wheel: pick a traversal direction from a starting track, \
                 group compatible tracks into six wheel positions, and flag the \
                 semitone or mode shifts needed for the rest."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests;
