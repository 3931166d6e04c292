//! The persisted configuration record.
//!
//! Every key has a default, so a partial file merges onto the defaults and
//! keys this version does not know are dropped the next time it is saved.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::path::expand_home;
use crate::error::{Result, UdsmError};
use crate::game::Game;
use crate::playlist::Playlists;

/// Scalar keys accepted by [`Config::get`] and [`Config::set`].
pub const SCALAR_KEYS: [&str; 7] = [
    "theme",
    "undertale_save_path",
    "deltarune_save_path",
    "undertale_file_path",
    "deltarune_file_path",
    "undertale_proc_name",
    "deltarune_proc_name",
];

/// Application configuration.
///
/// Path values are stored as strings; an empty string means "not set".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output theme name (see [`crate::theme`]).
    pub theme: String,
    /// Live save directory of UNDERTALE.
    pub undertale_save_path: String,
    /// Live save directory of DELTARUNE.
    pub deltarune_save_path: String,
    /// Executable used for direct UNDERTALE launches.
    pub undertale_file_path: String,
    /// Executable used for direct DELTARUNE launches.
    pub deltarune_file_path: String,
    /// Process name polled while a playlist runs.
    pub undertale_proc_name: String,
    pub deltarune_proc_name: String,
    /// Playlist name -> ordered SAVE names.
    pub playlists: Playlists,
}

impl Default for Config {
    fn default() -> Self {
        let save_path = |game: Game| {
            game.default_save_path()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        };

        Self {
            theme: String::new(),
            undertale_save_path: save_path(Game::Undertale),
            deltarune_save_path: save_path(Game::Deltarune),
            undertale_file_path: String::new(),
            deltarune_file_path: String::new(),
            undertale_proc_name: Game::Undertale.default_proc_name(),
            deltarune_proc_name: Game::Deltarune.default_proc_name(),
            playlists: Playlists::default(),
        }
    }
}

impl Config {
    /// Live save directory for a game, `None` if unset.
    pub fn save_path(&self, game: Game) -> Option<PathBuf> {
        let raw = match game {
            Game::Undertale => &self.undertale_save_path,
            Game::Deltarune => &self.deltarune_save_path,
        };
        non_empty_path(raw)
    }

    /// Executable for direct launches, `None` if unset.
    pub fn file_path(&self, game: Game) -> Option<PathBuf> {
        let raw = match game {
            Game::Undertale => &self.undertale_file_path,
            Game::Deltarune => &self.deltarune_file_path,
        };
        non_empty_path(raw)
    }

    /// Process name for the probe (may be empty).
    pub fn proc_name(&self, game: Game) -> &str {
        match game {
            Game::Undertale => self.undertale_proc_name.trim(),
            Game::Deltarune => self.deltarune_proc_name.trim(),
        }
    }

    /// Live save directory, or a validation error naming the missing key.
    pub fn require_save_path(&self, game: Game) -> Result<PathBuf> {
        self.save_path(game)
            .ok_or(UdsmError::MissingSavePath { game })
    }

    /// Direct-launch executable, or a validation error naming the missing key.
    pub fn require_file_path(&self, game: Game) -> Result<PathBuf> {
        self.file_path(game)
            .ok_or(UdsmError::MissingFilePath { game })
    }

    /// Read a scalar key.
    pub fn get(&self, key: &str) -> Result<&str> {
        let value = match key {
            "theme" => &self.theme,
            "undertale_save_path" => &self.undertale_save_path,
            "deltarune_save_path" => &self.deltarune_save_path,
            "undertale_file_path" => &self.undertale_file_path,
            "deltarune_file_path" => &self.deltarune_file_path,
            "undertale_proc_name" => &self.undertale_proc_name,
            "deltarune_proc_name" => &self.deltarune_proc_name,
            _ => {
                return Err(UdsmError::UnknownConfigKey {
                    key: key.to_string(),
                });
            }
        };
        Ok(value)
    }

    /// Write a scalar key. Playlists are edited through [`Playlists`] instead.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let slot = match key {
            "theme" => &mut self.theme,
            "undertale_save_path" => &mut self.undertale_save_path,
            "deltarune_save_path" => &mut self.deltarune_save_path,
            "undertale_file_path" => &mut self.undertale_file_path,
            "deltarune_file_path" => &mut self.deltarune_file_path,
            "undertale_proc_name" => &mut self.undertale_proc_name,
            "deltarune_proc_name" => &mut self.deltarune_proc_name,
            _ => {
                return Err(UdsmError::UnknownConfigKey {
                    key: key.to_string(),
                });
            }
        };
        debug!(key, value, "Setting config value");
        value.trim().clone_into(slot);
        Ok(())
    }
}

fn non_empty_path(raw: &str) -> Option<PathBuf> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match expand_home(raw.as_ref()) {
        Ok(path) => Some(path),
        Err(e) => {
            warn!(path = raw, error = %e, "Could not expand configured path");
            Some(PathBuf::from(raw))
        }
    }
}
