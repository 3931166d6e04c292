//! Test fixture helpers for save folders.
//!
//! A save folder is described as `(relative path, contents)` pairs and read
//! back the same way, so tests can compare whole trees at once.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use udsm::config::AppPaths;
use udsm::game::Game;
use udsm::store::SnapshotStore;
use walkdir::WalkDir;

/// Write `files` under `dir`, creating directories as needed.
///
/// # Panics
///
/// Panics if any file cannot be written.
pub fn write_tree(dir: &Path, files: &[(&str, &str)]) {
    fs::create_dir_all(dir).expect("Failed to create tree root");
    for (rel, contents) in files {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent");
        }
        fs::write(&path, contents).expect("Failed to write fixture file");
    }
}

/// Every regular file under `dir`, keyed by `/`-separated relative path.
///
/// # Panics
///
/// Panics if the tree cannot be read.
#[must_use]
pub fn read_tree(dir: &Path) -> BTreeMap<String, String> {
    WalkDir::new(dir)
        .into_iter()
        .map(|e| e.expect("Failed to walk tree"))
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let rel = e
                .path()
                .strip_prefix(dir)
                .expect("walked outside root")
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/");
            let contents = fs::read_to_string(e.path()).expect("Failed to read fixture file");
            (rel, contents)
        })
        .collect()
}

/// Typical UNDERTALE save folder contents.
pub const UNDERTALE_FILES: &[(&str, &str)] = &[
    ("file0", "Frisk\n7\n"),
    ("undertale.ini", "[General]\nName=\"Frisk\"\n"),
    ("config.ini", "[Settings]\n"),
];

/// Typical DELTARUNE save folder contents, including a nested folder.
pub const DELTARUNE_FILES: &[(&str, &str)] = &[
    ("filech1_0", "Kris\n1\n"),
    ("dr.ini", "[G]\n"),
    ("chapter2/filech2_0", "Kris\n2\n"),
];

/// An isolated data folder, store and live save folders for one test.
pub struct Sandbox {
    pub temp: TempDir,
    pub paths: AppPaths,
    pub store: SnapshotStore,
}

impl Sandbox {
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let paths = AppPaths::new(temp.path().join("app"));
        let store = SnapshotStore::new(&paths);
        Self { temp, paths, store }
    }

    /// Live save folder of a game inside the sandbox. The folder name ends
    /// with the game name, like the real ones do.
    #[must_use]
    pub fn live(&self, game: Game) -> PathBuf {
        self.temp.path().join("live").join(game.display_name())
    }

    /// A scratch folder outside the data folder.
    #[must_use]
    pub fn scratch(&self, name: &str) -> PathBuf {
        self.temp.path().join("scratch").join(name)
    }

    /// Create a SAVE from `files` and return its source folder.
    ///
    /// # Panics
    ///
    /// Panics if the SAVE cannot be created.
    pub fn snapshot(&self, game: Game, name: &str, files: &[(&str, &str)]) -> PathBuf {
        let src = self.scratch(name);
        write_tree(&src, files);
        let status = self.store.create(game, name, &src).expect("create failed");
        assert!(status.is_success(), "create {name}: {status:?}");
        src
    }
}

impl Default for Sandbox {
    fn default() -> Self {
        Self::new()
    }
}
