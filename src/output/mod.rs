//! Output mode abstraction for robot and human output.

use std::path::Path;

use serde::Serialize;

use crate::cli::Cli;
use crate::config::Config;
use crate::error::UdsmError;
use crate::game::Game;
use crate::playlist::{FinishReason, Playlists, TickEvent};
use crate::process::LaunchRequest;
use crate::store::{ApplyReport, ImportReport, OpStatus};
use crate::theme::Theme;

pub mod human;
pub mod robot;

pub use human::HumanOutput;
pub use robot::RobotOutput;

// === Result Types ===

/// SAVEs of one game.
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotListing {
    pub game: Game,
    pub names: Vec<String>,
}

/// A store mutation and how it went.
#[derive(Debug, Clone, Serialize)]
pub struct OpResult<'a> {
    pub action: &'static str,
    pub game: Game,
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_name: Option<&'a str>,
    pub result: &'a OpStatus,
}

/// A playlist entry resolved against the current listings.
#[derive(Debug, Clone, Serialize)]
pub struct PlaylistEntryView {
    pub index: usize,
    pub name: String,
    /// Game that currently has a SAVE by this name, if any.
    pub game: Option<Game>,
}

/// How a playlist run ended.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub playlist: String,
    pub reason: FinishReason,
    pub advanced: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Build metadata shown by `version`.
#[derive(Debug, Clone, Serialize)]
pub struct VersionInfo {
    pub version: &'static str,
    pub git_sha: &'static str,
    pub git_dirty: bool,
    pub build_timestamp: &'static str,
    pub rustc_version: &'static str,
    pub target: &'static str,
}

/// JSON formatting options for robot mode.
#[derive(Debug, Clone, Copy)]
pub enum RobotFormat {
    /// Pretty-printed JSON (default for --robot).
    Json,
    /// Single-line JSON (--format=json-compact).
    JsonCompact,
}

/// Determines how command output is rendered.
#[derive(Debug)]
pub enum OutputMode {
    /// JSON output for scripts.
    Robot(RobotFormat),
    /// Styled terminal output for human users.
    Human { theme: Theme, quiet: bool },
}

impl OutputMode {
    /// Create OutputMode from CLI arguments and the configured theme name.
    #[must_use]
    pub fn from_cli(cli: &Cli, theme_name: &str) -> Self {
        if cli.use_json() {
            let format = if cli.use_compact_json() {
                RobotFormat::JsonCompact
            } else {
                RobotFormat::Json
            };
            Self::Robot(format)
        } else {
            if cli.no_color {
                console::set_colors_enabled(false);
                console::set_colors_enabled_stderr(false);
            }
            Self::Human {
                theme: Theme::named(theme_name),
                quiet: cli.quiet,
            }
        }
    }

    /// Returns true if output should be JSON.
    #[must_use]
    pub const fn is_robot(&self) -> bool {
        matches!(self, Self::Robot(_))
    }

    /// Convert into the appropriate Output implementation.
    #[must_use]
    pub fn into_output(self) -> Box<dyn Output> {
        match self {
            Self::Robot(format) => Box::new(RobotOutput::new(format)),
            Self::Human { theme, quiet } => Box::new(HumanOutput::new(theme, quiet)),
        }
    }
}

/// Trait for all output operations.
///
/// Commands call these methods without knowing the output mode.
pub trait Output {
    // Basic messages
    fn success(&self, message: &str);
    fn error(&self, error: &UdsmError);
    fn warning(&self, message: &str);
    fn info(&self, message: &str);

    // SAVEs
    fn snapshot_list(&self, listings: &[SnapshotListing]);
    fn op_result(&self, op: &OpResult<'_>);
    fn apply_report(&self, report: &ApplyReport);
    fn import_report(&self, report: &ImportReport);

    // Backups and launching
    fn backup_list(&self, root: &Path, names: &[String]);
    fn launched(&self, request: &LaunchRequest);
    fn opened(&self, path: &Path);

    // Playlists
    fn playlist_list(&self, playlists: &Playlists);
    fn playlist_show(&self, name: &str, entries: &[PlaylistEntryView]);
    fn playlist_changed(&self, message: &str, name: &str, entries: &[String]);
    /// Called for every non-waiting tick of a run.
    fn tick_event(&self, event: &TickEvent);
    fn run_finished(&self, summary: &RunSummary);

    // Configuration
    fn config_show(&self, path: &Path, config: &Config);
    fn config_value(&self, key: &str, value: &str);
    fn path(&self, label: &str, path: &Path);

    // Metadata
    fn version_info(&self, info: &VersionInfo);
}
