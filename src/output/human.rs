//! Human-friendly output implementation using `console`.

use std::path::Path;

use console::Term;
use tracing::{debug, instrument, trace};

use crate::config::{Config, SCALAR_KEYS};
use crate::error::UdsmError;
use crate::playlist::{FinishReason, Playlists, TickEvent};
use crate::process::LaunchRequest;
use crate::store::{ApplyReport, BackupOutcome, ImportReport, OpStatus};
use crate::theme::Theme;

use super::{OpResult, Output, PlaylistEntryView, RunSummary, SnapshotListing, VersionInfo};

/// Styled terminal output implementation for human users.
pub struct HumanOutput {
    out: Term,
    err: Term,
    theme: Theme,
    quiet: bool,
}

impl HumanOutput {
    #[instrument(skip(theme), fields(theme = theme.name))]
    pub fn new(theme: Theme, quiet: bool) -> Self {
        debug!("Creating HumanOutput");
        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            theme,
            quiet,
        }
    }

    fn line(&self, text: &str) {
        // A closed stdout is not worth failing the command over.
        let _ = self.out.write_line(text);
    }

    fn err_line(&self, text: &str) {
        let _ = self.err.write_line(text);
    }

    fn tagged(&self, tag: &str, tag_style: &console::Style, message: &str) -> String {
        format!("{} {message}", tag_style.apply_to(tag))
    }

    fn status_line(&self, subject: &str, status: &OpStatus) {
        match status {
            OpStatus::Success => self.success(subject),
            OpStatus::NoOp(reason) => self.warning(&format!("{subject}: nothing done, {reason}")),
            OpStatus::Failed(reason) => {
                self.err_line(&self.tagged("[FAIL]", &self.theme.error, &format!("{subject}: {reason}")));
            }
        }
    }

    fn header(&self, title: &str) {
        self.line(&self.theme.header.apply_to(title).to_string());
    }
}

impl Output for HumanOutput {
    fn success(&self, message: &str) {
        if !self.quiet {
            self.line(&self.tagged("[OK]", &self.theme.success, message));
        }
    }

    #[instrument(skip(self))]
    fn error(&self, error: &UdsmError) {
        debug!(
            error = %error,
            recoverable = error.is_user_recoverable(),
            "Outputting error"
        );
        self.err_line(&self.tagged("[ERR]", &self.theme.error, &error.to_string()));
        if let Some(suggestion) = error.suggestion() {
            trace!(suggestion, "Adding suggestion");
            self.err_line(&format!(
                "      {} {}",
                self.theme.label.apply_to("Hint:"),
                self.theme.muted.apply_to(suggestion)
            ));
        }
    }

    fn warning(&self, message: &str) {
        self.err_line(&self.tagged("[WARN]", &self.theme.warning, message));
    }

    fn info(&self, message: &str) {
        if !self.quiet {
            self.line(&self.tagged("[INFO]", &self.theme.accent, message));
        }
    }

    #[instrument(skip(self, listings), fields(games = listings.len()))]
    fn snapshot_list(&self, listings: &[SnapshotListing]) {
        for (i, listing) in listings.iter().enumerate() {
            if i > 0 {
                self.line("");
            }
            let title = format!("{} SAVEs ({})", listing.game, listing.names.len());
            self.line(&self.theme.game(listing.game).apply_to(title).bold().to_string());
            if listing.names.is_empty() {
                self.line(&format!("  {}", self.theme.muted.apply_to("(none)")));
            }
            for name in &listing.names {
                self.line(&format!("  {name}"));
            }
        }
    }

    fn op_result(&self, op: &OpResult<'_>) {
        let subject = match op.new_name {
            Some(new_name) => format!("{} {} SAVE '{}' -> '{new_name}'", op.action, op.game, op.name),
            None => format!("{} {} SAVE '{}'", op.action, op.game, op.name),
        };
        self.status_line(&subject, op.result);
    }

    #[instrument(skip(self, report), fields(game = %report.game, name = %report.name))]
    fn apply_report(&self, report: &ApplyReport) {
        match &report.backup {
            BackupOutcome::Archived(path) => self.info(&format!(
                "Backed up previous save to {}",
                path.display()
            )),
            BackupOutcome::NothingToArchive => {}
            BackupOutcome::Failed(reason) => self.warning(&format!("Backup failed: {reason}")),
        }
        let subject = format!(
            "Applied {} SAVE '{}' to {}",
            report.game,
            report.name,
            report.live_path.display()
        );
        self.status_line(&subject, &report.status);
    }

    fn import_report(&self, report: &ImportReport) {
        for entry in &report.entries {
            let label = format!("{} / {} / {}", entry.game, entry.category, entry.name);
            if entry.imported() {
                self.success(&format!("Imported {label}"));
            } else if let Some(error) = &entry.error {
                self.warning(&format!("Skipped {label}: {error}"));
            } else {
                self.status_line(&format!("Import {label}"), &entry.status);
            }
        }
        self.line(&format!(
            "{} imported, {} skipped",
            self.theme.value.apply_to(report.imported_count()),
            self.theme.value.apply_to(report.skipped_count())
        ));
    }

    fn backup_list(&self, root: &Path, names: &[String]) {
        self.header(&format!("Backups in {}", root.display()));
        if names.is_empty() {
            self.line(&format!("  {}", self.theme.muted.apply_to("(none)")));
        }
        for name in names {
            self.line(&format!("  {name}"));
        }
    }

    fn launched(&self, request: &LaunchRequest) {
        match request {
            LaunchRequest::Steam { game, url } => {
                self.success(&format!("Launching {game} via {url}"));
            }
            LaunchRequest::File { game, path } => {
                self.success(&format!("Launching {game} from {}", path.display()));
            }
        }
    }

    fn opened(&self, path: &Path) {
        self.success(&format!("Opening {}", path.display()));
    }

    fn playlist_list(&self, playlists: &Playlists) {
        if playlists.is_empty() {
            self.info("No playlists yet. Create one with: udsm playlist new");
            return;
        }
        for (name, entries) in playlists.iter() {
            self.line(&format!(
                "{}  {}",
                self.theme.value.apply_to(name),
                self.theme.muted.apply_to(format!("({} entries)", entries.len()))
            ));
        }
    }

    fn playlist_show(&self, name: &str, entries: &[PlaylistEntryView]) {
        self.header(name);
        if entries.is_empty() {
            self.line(&format!("  {}", self.theme.muted.apply_to("(empty)")));
        }
        for entry in entries {
            let index = self.theme.index.apply_to(format!("{:>3}", entry.index));
            match entry.game {
                Some(game) => self.line(&format!(
                    "{index}  {}  {}",
                    entry.name,
                    self.theme.game(game).apply_to(game.display_name())
                )),
                None => self.line(&format!(
                    "{index}  {}  {}",
                    entry.name,
                    self.theme.warning.apply_to("(missing)")
                )),
            }
        }
    }

    fn playlist_changed(&self, message: &str, name: &str, entries: &[String]) {
        self.success(&format!("{message} ({name}: {} entries)", entries.len()));
    }

    fn tick_event(&self, event: &TickEvent) {
        match event {
            TickEvent::Advanced { entry, report, .. } => {
                let game = self.theme.game(report.game).apply_to(report.game.display_name());
                if report.status.is_success() {
                    self.line(&self.tagged(
                        "[NEXT]",
                        &self.theme.accent,
                        &format!("{entry} ({game})"),
                    ));
                } else {
                    self.apply_report(report);
                }
            }
            TickEvent::Skipped { entry } => {
                self.warning(&format!("Skipped '{entry}': no SAVE with that name"));
            }
            TickEvent::Inert | TickEvent::Waiting { .. } | TickEvent::Finished => {}
        }
    }

    fn run_finished(&self, summary: &RunSummary) {
        let verb = match summary.reason {
            FinishReason::Completed => "Finished",
            FinishReason::Cancelled => "Cancelled",
        };
        let message = format!(
            "{verb} playlist '{}': {} played, {} skipped, {} failed",
            summary.playlist, summary.advanced, summary.skipped, summary.failed
        );
        match summary.reason {
            FinishReason::Completed => self.success(&message),
            FinishReason::Cancelled => self.warning(&message),
        }
    }

    fn config_show(&self, path: &Path, config: &Config) {
        self.header(&path.display().to_string());
        for key in SCALAR_KEYS {
            let value = config.get(key).unwrap_or_default();
            let shown = if value.is_empty() {
                self.theme.muted.apply_to("(unset)".to_string())
            } else {
                self.theme.value.apply_to(value.to_string())
            };
            self.line(&format!("  {}  {shown}", self.theme.label.apply_to(format!("{key:<20}"))));
        }
        self.line(&format!(
            "  {}  {}",
            self.theme.label.apply_to(format!("{:<20}", "playlists")),
            self.theme.value.apply_to(config.playlists.len())
        ));
    }

    fn config_value(&self, _key: &str, value: &str) {
        self.line(value);
    }

    fn path(&self, _label: &str, path: &Path) {
        self.line(&path.display().to_string());
    }

    fn version_info(&self, info: &VersionInfo) {
        let label = |name: &str| self.theme.label.apply_to(format!("  {name:<10}")).to_string();
        self.line(&format!(
            "{} {}",
            self.theme.accent.apply_to("udsm"),
            self.theme.value.apply_to(info.version)
        ));
        let dirty = if info.git_dirty {
            self.theme.warning.apply_to(" (dirty)").to_string()
        } else {
            String::new()
        };
        self.line(&format!("{}{}{dirty}", label("Git SHA"), info.git_sha));
        self.line(&format!("{}{}", label("Built"), info.build_timestamp));
        self.line(&format!("{}{}", label("Rust"), info.rustc_version));
        self.line(&format!("{}{}", label("Target"), info.target));
    }
}
