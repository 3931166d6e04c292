//! Robot mode JSON output implementation.

use std::path::Path;

use serde::Serialize;
use serde_json::json;
use tracing::{debug, instrument, trace, warn};

use crate::config::Config;
use crate::error::UdsmError;
use crate::playlist::{Playlists, TickEvent};
use crate::process::LaunchRequest;
use crate::store::{ApplyReport, ImportReport};

use super::{
    OpResult, Output, PlaylistEntryView, RobotFormat, RunSummary, SnapshotListing, VersionInfo,
};

/// JSON output implementation for scripts.
///
/// Results go to stdout, errors to stderr. Run events are streamed one JSON
/// object per line.
pub struct RobotOutput {
    format: RobotFormat,
}

impl RobotOutput {
    #[instrument]
    pub fn new(format: RobotFormat) -> Self {
        debug!(?format, "Creating RobotOutput");
        Self { format }
    }

    fn render<T: Serialize + ?Sized>(&self, data: &T, pretty: bool) -> Option<String> {
        let rendered = if pretty {
            serde_json::to_string_pretty(data)
        } else {
            serde_json::to_string(data)
        };
        match rendered {
            Ok(json) => {
                trace!(json_len = json.len(), "JSON serialized");
                Some(json)
            }
            Err(e) => {
                warn!(error = %e, "Failed to serialize output");
                None
            }
        }
    }

    /// Output any serializable data as JSON to stdout.
    #[instrument(skip(self, data), fields(format = ?self.format))]
    fn output_json<T: Serialize + ?Sized>(&self, data: &T) {
        let pretty = matches!(self.format, RobotFormat::Json);
        if let Some(json) = self.render(data, pretty) {
            println!("{json}");
        }
    }

    /// Output single-line JSON (for streaming events).
    fn output_json_line<T: Serialize + ?Sized>(&self, data: &T) {
        if let Some(json) = self.render(data, false) {
            println!("{json}");
        }
    }

    /// Output pretty JSON to stderr.
    fn output_json_stderr<T: Serialize + ?Sized>(&self, data: &T) {
        if let Some(json) = self.render(data, true) {
            eprintln!("{json}");
        }
    }
}

impl Output for RobotOutput {
    fn success(&self, message: &str) {
        self.output_json(&json!({ "success": true, "message": message }));
    }

    #[instrument(skip(self))]
    fn error(&self, error: &UdsmError) {
        debug!(error = %error, "Robot: error");
        self.output_json_stderr(&json!({
            "error": true,
            "message": error.to_string(),
            "suggestion": error.suggestion(),
            "recoverable": error.is_user_recoverable(),
        }));
    }

    fn warning(&self, message: &str) {
        self.output_json_stderr(&json!({ "warning": true, "message": message }));
    }

    fn info(&self, message: &str) {
        self.output_json(&json!({ "info": true, "message": message }));
    }

    fn snapshot_list(&self, listings: &[SnapshotListing]) {
        self.output_json(listings);
    }

    fn op_result(&self, op: &OpResult<'_>) {
        self.output_json(op);
    }

    fn apply_report(&self, report: &ApplyReport) {
        self.output_json(report);
    }

    fn import_report(&self, report: &ImportReport) {
        self.output_json(&json!({
            "imported": report.imported_count(),
            "skipped": report.skipped_count(),
            "entries": report.entries,
        }));
    }

    fn backup_list(&self, root: &Path, names: &[String]) {
        self.output_json(&json!({
            "root": root.display().to_string(),
            "backups": names,
        }));
    }

    fn launched(&self, request: &LaunchRequest) {
        self.output_json(&json!({ "launched": request }));
    }

    fn opened(&self, path: &Path) {
        self.output_json(&json!({ "opened": path.display().to_string() }));
    }

    fn playlist_list(&self, playlists: &Playlists) {
        let summary: Vec<_> = playlists
            .iter()
            .map(|(name, entries)| json!({ "name": name, "entries": entries.len() }))
            .collect();
        self.output_json(&summary);
    }

    fn playlist_show(&self, name: &str, entries: &[PlaylistEntryView]) {
        self.output_json(&json!({ "name": name, "entries": entries }));
    }

    fn playlist_changed(&self, message: &str, name: &str, entries: &[String]) {
        self.output_json(&json!({
            "success": true,
            "message": message,
            "playlist": name,
            "entries": entries,
        }));
    }

    fn tick_event(&self, event: &TickEvent) {
        self.output_json_line(event);
    }

    fn run_finished(&self, summary: &RunSummary) {
        self.output_json_line(&json!({ "event": "run_finished", "summary": summary }));
    }

    fn config_show(&self, path: &Path, config: &Config) {
        self.output_json(&json!({
            "path": path.display().to_string(),
            "config": config,
        }));
    }

    fn config_value(&self, key: &str, value: &str) {
        self.output_json(&json!({ "key": key, "value": value }));
    }

    fn path(&self, label: &str, path: &Path) {
        self.output_json(&json!({ label: path.display().to_string() }));
    }

    fn version_info(&self, info: &VersionInfo) {
        self.output_json(info);
    }
}
