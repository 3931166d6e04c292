//! Filesystem layout of the application root and path helpers.
//!
//! ```text
//! <root>/
//! ├── config.toml
//! ├── latest.log
//! ├── undertale_saves/<name>/...
//! ├── deltarune_saves/<name>/...
//! └── backups/<GAME>_<name>_<timestamp>/...
//! ```

use std::path::{Path, PathBuf};

use tracing::{debug, instrument, trace};

use crate::error::{Result, UdsmError};
use crate::game::Game;

/// Directory name under the platform data directory.
pub const APP_DIR_NAME: &str = "ut-dr-save-manager";

/// Environment variable overriding the application root.
pub const HOME_ENV: &str = "UDSM_HOME";

pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const LOG_FILE_NAME: &str = "latest.log";
pub const BACKUPS_DIR_NAME: &str = "backups";

/// Resolved locations of everything the application persists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    root: PathBuf,
}

impl AppPaths {
    /// Use an explicit root directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve the root from an override (CLI flag or `UDSM_HOME`), falling
    /// back to the platform data directory.
    pub fn resolve(override_root: Option<&Path>) -> Result<Self> {
        if let Some(root) = override_root {
            let root = expand_home(root)?;
            debug!(root = %root.display(), "Using overridden application root");
            return Ok(Self::new(root));
        }

        let data = dirs::data_dir().ok_or_else(|| {
            UdsmError::ConfigInvalid("Could not determine data directory".to_string())
        })?;
        Ok(Self::new(data.join(APP_DIR_NAME)))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join(CONFIG_FILE_NAME)
    }

    pub fn log_file(&self) -> PathBuf {
        self.root.join(LOG_FILE_NAME)
    }

    pub fn backups_dir(&self) -> PathBuf {
        self.root.join(BACKUPS_DIR_NAME)
    }

    /// Directory holding one game's snapshot collection.
    pub fn saves_dir(&self, game: Game) -> PathBuf {
        self.root.join(game.saves_dir_name())
    }

    /// Create the root and all collection directories.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn ensure_layout(&self) -> Result<()> {
        for dir in [
            self.root.clone(),
            self.saves_dir(Game::Undertale),
            self.saves_dir(Game::Deltarune),
            self.backups_dir(),
        ] {
            std::fs::create_dir_all(&dir).map_err(|e| {
                UdsmError::Other(format!("Failed to create directory {}: {e}", dir.display()))
            })?;
            trace!(dir = %dir.display(), "Directory ready");
        }
        Ok(())
    }
}

/// Expand a leading `~` to the home directory; other paths are returned as-is.
pub fn expand_home(path: &Path) -> Result<PathBuf> {
    let path_str = path.to_string_lossy();

    if path_str == "~" || path_str.starts_with("~/") || path_str.starts_with("~\\") {
        let home = home_dir()?;
        let rest = path_str[1..].trim_start_matches(['/', '\\']);
        let resolved = if rest.is_empty() {
            home
        } else {
            home.join(rest)
        };
        trace!(
            original = %path.display(),
            resolved = %resolved.display(),
            "Expanded home directory path"
        );
        return Ok(resolved);
    }

    Ok(path.to_path_buf())
}

/// Resolve the user's home directory (cross-platform).
pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| {
        UdsmError::ConfigInvalid("Could not determine home directory".to_string())
    })
}
