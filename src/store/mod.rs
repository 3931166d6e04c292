//! Snapshot store: named copies of each game's save folder.
//!
//! Each snapshot is a plain directory under the game's collection directory
//! (`undertale_saves/<name>/`, `deltarune_saves/<name>/`). Listings are read
//! from disk on every call so they always reflect the filesystem.
//!
//! Only name validation fails with an error. Anything the filesystem does
//! underneath us (source vanished, target appeared, copy failed) is reported
//! through [`OpStatus`] and leaves the store as it was.
//!
//! # Usage
//!
//! ```ignore
//! use udsm::config::AppPaths;
//! use udsm::game::Game;
//! use udsm::store::SnapshotStore;
//!
//! let store = SnapshotStore::new(&AppPaths::resolve(None)?);
//! store.create(Game::Undertale, "Before Asgore", live_dir)?;
//! let report = store.apply(Game::Undertale, "Before Asgore", live_dir);
//! ```

mod backup;
mod fsops;
mod import;

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

pub use backup::{BACKUP_TIMESTAMP_FORMAT, BackupArchiver, BackupOutcome};
pub use fsops::{copy_tree, move_tree};
pub use import::{ImportEntry, ImportReport};

use crate::config::AppPaths;
use crate::error::{Result, UdsmError};
use crate::game::Game;

/// Why an operation had nothing to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoOpReason {
    /// The directory to read, move or delete does not exist.
    SourceMissing,
    /// The directory to write already exists.
    TargetExists,
}

impl fmt::Display for NoOpReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SourceMissing => f.write_str("source does not exist"),
            Self::TargetExists => f.write_str("target already exists"),
        }
    }
}

/// Result of a filesystem transition in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum OpStatus {
    Success,
    NoOp(NoOpReason),
    /// The operation was attempted and abandoned; nothing was changed.
    Failed(String),
}

impl OpStatus {
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Outcome of [`SnapshotStore::apply`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    pub game: Game,
    pub name: String,
    pub live_path: PathBuf,
    pub backup: BackupOutcome,
    pub status: OpStatus,
}

/// Both games' snapshot collections plus the backup archiver.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    undertale_dir: PathBuf,
    deltarune_dir: PathBuf,
    archiver: BackupArchiver,
}

impl SnapshotStore {
    pub fn new(paths: &AppPaths) -> Self {
        Self {
            undertale_dir: paths.saves_dir(Game::Undertale),
            deltarune_dir: paths.saves_dir(Game::Deltarune),
            archiver: BackupArchiver::new(paths.backups_dir()),
        }
    }

    pub fn archiver(&self) -> &BackupArchiver {
        &self.archiver
    }

    /// Collection directory of a game.
    pub fn collection_dir(&self, game: Game) -> &Path {
        match game {
            Game::Undertale => &self.undertale_dir,
            Game::Deltarune => &self.deltarune_dir,
        }
    }

    /// Directory backing a snapshot (which may not exist).
    pub fn snapshot_path(&self, game: Game, name: &str) -> PathBuf {
        self.collection_dir(game).join(name)
    }

    /// Snapshot names of a game, ordinal sort by directory name.
    pub fn list(&self, game: Game) -> Vec<String> {
        let dir = self.collection_dir(game);
        let Ok(entries) = fs::read_dir(dir) else {
            debug!(dir = %dir.display(), "Collection directory missing, listing as empty");
            return Vec::new();
        };

        let mut names: Vec<String> = entries
            .flatten()
            .filter(|e| e.path().is_dir())
            .filter_map(|e| match e.file_name().into_string() {
                Ok(name) => Some(name),
                Err(raw) => {
                    warn!(name = ?raw, "Skipping snapshot with non UTF-8 name");
                    None
                }
            })
            .collect();
        names.sort();
        names
    }

    /// Whether `name` is listed for `game` (exact match).
    pub fn contains(&self, game: Game, name: &str) -> bool {
        self.list(game).iter().any(|n| n == name)
    }

    /// The game whose listing holds `name`, UNDERTALE first.
    pub fn find_game(&self, name: &str) -> Option<Game> {
        Game::ALL.into_iter().find(|&game| self.contains(game, name))
    }

    /// Lowercased names of both collections together.
    pub fn all_names_lower(&self) -> HashSet<String> {
        Game::ALL
            .into_iter()
            .flat_map(|game| self.list(game))
            .map(|n| n.to_lowercase())
            .collect()
    }

    /// Check a new SAVE name and return it trimmed.
    ///
    /// Rejects empty names, names that cannot be a single directory name and
    /// names already used (case-insensitively) by either game.
    pub fn validate_name(&self, name: &str) -> Result<String> {
        let name = check_name_shape(name)?;
        if self.all_names_lower().contains(&name.to_lowercase()) {
            return Err(UdsmError::DuplicateName { name });
        }
        Ok(name)
    }

    /// Create a snapshot of `game` named `name` from the directory `source`.
    #[instrument(skip(self, source), fields(source = %source.as_ref().display()))]
    pub fn create(&self, game: Game, name: &str, source: impl AsRef<Path>) -> Result<OpStatus> {
        let source = source.as_ref();
        let name = self.validate_name(name)?;
        let target = self.snapshot_path(game, &name);

        if target.exists() {
            debug!("Snapshot directory already exists, skipping");
            return Ok(OpStatus::NoOp(NoOpReason::TargetExists));
        }
        if !source.is_dir() {
            warn!("Source directory does not exist");
            return Ok(OpStatus::NoOp(NoOpReason::SourceMissing));
        }

        if let Err(e) = fs::create_dir_all(self.collection_dir(game)) {
            return Ok(OpStatus::Failed(e.to_string()));
        }
        match copy_tree(source, &target) {
            Ok(()) => {
                info!(%game, name = %name, "Created snapshot");
                Ok(OpStatus::Success)
            }
            Err(e) => {
                warn!(error = %e, "Failed to copy snapshot");
                fsops::remove_partial(&target);
                Ok(OpStatus::Failed(e.to_string()))
            }
        }
    }

    /// Rename a snapshot. Never overwrites an existing snapshot.
    #[instrument(skip(self))]
    pub fn rename(&self, game: Game, old: &str, new: &str) -> Result<OpStatus> {
        let new = check_name_shape(new)?;
        let source = self.snapshot_path(game, old);
        if !is_plain_name(old) || !source.is_dir() {
            return Ok(OpStatus::NoOp(NoOpReason::SourceMissing));
        }
        let target = self.snapshot_path(game, &new);
        if target.exists() {
            return Ok(OpStatus::NoOp(NoOpReason::TargetExists));
        }
        if self.all_names_lower().contains(&new.to_lowercase()) {
            return Err(UdsmError::DuplicateName { name: new });
        }

        match move_tree(&source, &target) {
            Ok(()) => {
                info!(%game, old, new = %new, "Renamed snapshot");
                Ok(OpStatus::Success)
            }
            Err(e) => {
                warn!(error = %e, "Failed to rename snapshot");
                Ok(OpStatus::Failed(e.to_string()))
            }
        }
    }

    /// Delete a snapshot and everything in it.
    #[instrument(skip(self))]
    pub fn delete(&self, game: Game, name: &str) -> OpStatus {
        let path = self.snapshot_path(game, name);
        if !is_plain_name(name) || !path.is_dir() {
            return OpStatus::NoOp(NoOpReason::SourceMissing);
        }
        match fs::remove_dir_all(&path) {
            Ok(()) => {
                info!(%game, name, "Deleted snapshot");
                OpStatus::Success
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                OpStatus::NoOp(NoOpReason::SourceMissing)
            }
            Err(e) => {
                warn!(error = %e, "Failed to delete snapshot");
                OpStatus::Failed(e.to_string())
            }
        }
    }

    /// Replace the live save at `live_path` with a snapshot.
    ///
    /// The snapshot is copied next to the live save first; only once that
    /// copy is complete is the live save archived and the copy moved into
    /// place. If the live save cannot be archived it is left untouched and
    /// the apply is abandoned.
    #[instrument(skip(self), fields(live = %live_path.display()))]
    pub fn apply(&self, game: Game, name: &str, live_path: &Path) -> ApplyReport {
        self.apply_with(game, name, live_path, |staged, live| fs::rename(staged, live))
    }

    /// [`apply`](Self::apply) with the final move of the staged copy over
    /// the live path supplied by the caller.
    fn apply_with(
        &self,
        game: Game,
        name: &str,
        live_path: &Path,
        place: impl FnOnce(&Path, &Path) -> io::Result<()>,
    ) -> ApplyReport {
        let report = |backup: BackupOutcome, status: OpStatus| ApplyReport {
            game,
            name: name.to_string(),
            live_path: live_path.to_path_buf(),
            backup,
            status,
        };

        let source = self.snapshot_path(game, name);
        if !is_plain_name(name) || !source.is_dir() {
            warn!("Snapshot to apply does not exist");
            return report(
                BackupOutcome::NothingToArchive,
                OpStatus::NoOp(NoOpReason::SourceMissing),
            );
        }

        let staging = match staging_path(live_path) {
            Some(path) => path,
            None => {
                return report(
                    BackupOutcome::NothingToArchive,
                    OpStatus::Failed("live save path has no parent directory".to_string()),
                );
            }
        };

        // Stage the new content.
        fsops::remove_partial(&staging);
        let staged = staging
            .parent()
            .map_or(Ok(()), fs::create_dir_all)
            .and_then(|()| copy_tree(&source, &staging));
        if let Err(e) = staged {
            warn!(error = %e, "Failed to stage snapshot");
            fsops::remove_partial(&staging);
            return report(BackupOutcome::NothingToArchive, OpStatus::Failed(e.to_string()));
        }

        let backup = self.archiver.archive(game, name, live_path);
        if let BackupOutcome::Failed(reason) = &backup {
            if live_path.exists() {
                warn!("Live save could not be archived, abandoning apply");
                fsops::remove_partial(&staging);
                let status = OpStatus::Failed(format!("backup failed: {reason}"));
                return report(backup, status);
            }
        }

        if let Err(e) = place(&staging, live_path) {
            warn!(error = %e, "Failed to move staged snapshot into place");
            fsops::remove_partial(&staging);
            if let Some(archived) = backup.archived_path() {
                if let Err(restore_err) = move_tree(archived, live_path) {
                    warn!(error = %restore_err, "Failed to restore live save from backup");
                }
            }
            return report(backup, OpStatus::Failed(e.to_string()));
        }

        info!(%game, name, "Applied snapshot");
        report(backup, OpStatus::Success)
    }
}

/// Trim a name and check it can serve as a single directory name.
fn check_name_shape(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(UdsmError::EmptyName);
    }
    let invalid = |reason| UdsmError::InvalidName {
        name: name.to_string(),
        reason,
    };
    if name == "." || name == ".." {
        return Err(invalid("reserved directory name"));
    }
    if name.contains(['/', '\\']) {
        return Err(invalid("must not contain path separators"));
    }
    if name.contains('\0') {
        return Err(invalid("must not contain NUL"));
    }
    Ok(name.to_string())
}

/// Whether `name` addresses exactly one entry of a collection directory.
fn is_plain_name(name: &str) -> bool {
    check_name_shape(name).is_ok_and(|n| n == name)
}

/// Sibling of the live save used to stage a copy before swapping it in.
fn staging_path(live_path: &Path) -> Option<PathBuf> {
    let parent = live_path.parent()?;
    let file_name = live_path.file_name()?.to_string_lossy();
    Some(parent.join(format!(".{file_name}.udsm-staging")))
}
