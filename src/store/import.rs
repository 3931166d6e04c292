//! Bulk import of premade SAVE trees.
//!
//! Expected layout: `<root>/<game>/<category>/<save>/`. A game directory
//! named `undertale` (any case) feeds UNDERTALE; every other game directory
//! feeds DELTARUNE.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::{OpStatus, SnapshotStore};
use crate::game::Game;

/// Outcome of importing one save directory.
#[derive(Debug, Clone, Serialize)]
pub struct ImportEntry {
    pub game: Game,
    pub category: String,
    pub name: String,
    pub source: PathBuf,
    pub status: OpStatus,
    /// Validation error, if the name was rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ImportEntry {
    pub fn imported(&self) -> bool {
        self.error.is_none() && self.status.is_success()
    }
}

/// Result of [`SnapshotStore::import_tree`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportReport {
    pub entries: Vec<ImportEntry>,
}

impl ImportReport {
    pub fn imported_count(&self) -> usize {
        self.entries.iter().filter(|e| e.imported()).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.entries.len() - self.imported_count()
    }
}

fn sorted_subdirs(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        warn!(dir = %dir.display(), "Cannot read directory");
        return Vec::new();
    };
    let mut dirs: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    dirs.sort();
    dirs
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

impl SnapshotStore {
    /// Import every `<game>/<category>/<save>` directory under `root`.
    ///
    /// With `filter`, only saves whose game or category directory name equals
    /// it are imported. Name clashes and other validation failures are
    /// recorded per entry and do not stop the import.
    #[instrument(skip(self), fields(root = %root.display()))]
    pub fn import_tree(&self, root: &Path, filter: Option<&str>) -> ImportReport {
        let mut report = ImportReport::default();

        for game_dir in sorted_subdirs(root) {
            let game_name = dir_name(&game_dir);
            let game = if game_name.eq_ignore_ascii_case(Game::Undertale.id()) {
                Game::Undertale
            } else {
                Game::Deltarune
            };

            for category_dir in sorted_subdirs(&game_dir) {
                let category = dir_name(&category_dir);
                if filter.is_some_and(|f| f != game_name && f != category) {
                    debug!(category = %category, "Filtered out");
                    continue;
                }

                for save_dir in sorted_subdirs(&category_dir) {
                    let name = dir_name(&save_dir);
                    let (status, error) = match self.create(game, &name, &save_dir) {
                        Ok(status) => (status, None),
                        Err(e) => (OpStatus::Failed(e.to_string()), Some(e.to_string())),
                    };
                    report.entries.push(ImportEntry {
                        game,
                        category: category.clone(),
                        name,
                        source: save_dir,
                        status,
                        error,
                    });
                }
            }
        }

        info!(
            imported = report.imported_count(),
            skipped = report.skipped_count(),
            "Import finished"
        );
        report
    }
}
