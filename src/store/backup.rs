//! Backup archiver: preserves the live save before an apply replaces it.
//!
//! Each archive lands in `backups/{GAME}_{name}_{YYYY-MM-DD_HH-MM-SS}`.
//! Backups are never pruned; the directory grows by one entry per apply and
//! cleaning it up is left to the user.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::fsops::move_tree;
use crate::game::Game;

/// Timestamp layout used in backup directory names (second granularity).
pub const BACKUP_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// What happened to the live save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum BackupOutcome {
    /// The live save was moved to this backup directory.
    Archived(PathBuf),
    /// There was no live save to preserve.
    NothingToArchive,
    /// The live save could not be moved; it is still in place.
    Failed(String),
}

impl BackupOutcome {
    pub fn archived_path(&self) -> Option<&Path> {
        match self {
            Self::Archived(path) => Some(path),
            _ => None,
        }
    }
}

/// Moves live saves into the backup root.
#[derive(Debug, Clone)]
pub struct BackupArchiver {
    root: PathBuf,
}

impl BackupArchiver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory name for a backup taken at `at`.
    pub fn backup_name(game: Game, snapshot_name: &str, at: DateTime<Local>) -> String {
        format!(
            "{}_{}_{}",
            game.backup_prefix(),
            snapshot_name,
            at.format(BACKUP_TIMESTAMP_FORMAT)
        )
    }

    /// First free backup path for this name and time. Applies landing in the
    /// same second get `_2`, `_3`, ... appended.
    fn free_target(&self, base: &str) -> PathBuf {
        let first = self.root.join(base);
        if !first.exists() {
            return first;
        }
        (2u32..)
            .map(|n| self.root.join(format!("{base}_{n}")))
            .find(|p| !p.exists())
            .unwrap_or(first)
    }

    /// Move the live save at `live_path` into the backup root.
    ///
    /// Never returns an error: a failure is reported as
    /// [`BackupOutcome::Failed`] and leaves the live save where it was.
    #[instrument(skip(self), fields(live = %live_path.display()))]
    pub fn archive(&self, game: Game, snapshot_name: &str, live_path: &Path) -> BackupOutcome {
        if !live_path.exists() {
            debug!("No live save present, nothing to archive");
            return BackupOutcome::NothingToArchive;
        }

        if let Err(e) = fs::create_dir_all(&self.root) {
            warn!(error = %e, root = %self.root.display(), "Could not create backup root");
            return BackupOutcome::Failed(e.to_string());
        }

        let base = Self::backup_name(game, snapshot_name, Local::now());
        let target = self.free_target(&base);

        match move_tree(live_path, &target) {
            Ok(()) => {
                info!(backup = %target.display(), "Archived live save");
                BackupOutcome::Archived(target)
            }
            Err(e) => {
                warn!(error = %e, target = %target.display(), "Failed to archive live save");
                BackupOutcome::Failed(e.to_string())
            }
        }
    }

    /// Existing backup directory names, sorted.
    pub fn list(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(&self.root) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .flatten()
            .filter(|e| e.file_type().is_ok_and(|t| t.is_dir()))
            .filter_map(|e| e.file_name().into_string().ok())
            .collect();
        names.sort();
        names
    }
}
