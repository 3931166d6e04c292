//! The named playlist collection persisted in the configuration.
//!
//! Entries are plain SAVE names. Renaming or deleting a SAVE does not touch
//! playlists that mention it; the runner skips such entries when it reaches
//! them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::error::{Result, UdsmError};

/// Name given to playlists created without one.
pub const DEFAULT_PLAYLIST_NAME: &str = "New Playlist";

/// All playlists, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Playlists(BTreeMap<String, Vec<String>>);

impl Playlists {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Playlist names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.0.get(name).map(Vec::as_slice)
    }

    /// Entries of a playlist, or `PlaylistNotFound`.
    pub fn entries(&self, name: &str) -> Result<&[String]> {
        self.get(name).ok_or_else(|| not_found(name))
    }

    fn entries_mut(&mut self, name: &str) -> Result<&mut Vec<String>> {
        self.0.get_mut(name).ok_or_else(|| not_found(name))
    }

    fn name_taken(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.0.keys().any(|k| k.to_lowercase() == lower)
    }

    /// Create an empty playlist with the first free default name
    /// (`New Playlist`, `New Playlist 2`, ...). Returns the chosen name.
    #[instrument(skip(self))]
    pub fn create(&mut self) -> String {
        let name = (1..)
            .map(|n| {
                if n == 1 {
                    DEFAULT_PLAYLIST_NAME.to_string()
                } else {
                    format!("{DEFAULT_PLAYLIST_NAME} {n}")
                }
            })
            .find(|candidate| !self.name_taken(candidate))
            .unwrap_or_else(|| DEFAULT_PLAYLIST_NAME.to_string());
        info!(name = %name, "Created playlist");
        self.0.insert(name.clone(), Vec::new());
        name
    }

    /// Create an empty playlist with a given name.
    #[instrument(skip(self))]
    pub fn create_named(&mut self, name: &str) -> Result<String> {
        let name = self.validate_new_name(name)?;
        info!(name = %name, "Created playlist");
        self.0.insert(name.clone(), Vec::new());
        Ok(name)
    }

    fn validate_new_name(&self, name: &str) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(UdsmError::EmptyPlaylistName);
        }
        if self.name_taken(name) {
            return Err(UdsmError::PlaylistExists {
                name: name.to_string(),
            });
        }
        Ok(name.to_string())
    }

    /// Rename a playlist, keeping its entries.
    #[instrument(skip(self))]
    pub fn rename(&mut self, old: &str, new: &str) -> Result<String> {
        if !self.0.contains_key(old) {
            return Err(not_found(old));
        }
        let trimmed = new.trim();
        // Changing only the case of the own name is allowed.
        let new = if trimmed.to_lowercase() == old.to_lowercase() && !trimmed.is_empty() {
            trimmed.to_string()
        } else {
            self.validate_new_name(new)?
        };
        let entries = self.0.remove(old).unwrap_or_default();
        self.0.insert(new.clone(), entries);
        info!(old, new = %new, "Renamed playlist");
        Ok(new)
    }

    /// Delete a playlist and its entries.
    #[instrument(skip(self))]
    pub fn delete(&mut self, name: &str) -> Result<Vec<String>> {
        let entries = self.0.remove(name).ok_or_else(|| not_found(name))?;
        info!(name, entries = entries.len(), "Deleted playlist");
        Ok(entries)
    }

    /// Append a SAVE name to the end of a playlist.
    #[instrument(skip(self))]
    pub fn append(&mut self, name: &str, entry: &str) -> Result<usize> {
        let entries = self.entries_mut(name)?;
        entries.push(entry.to_string());
        debug!(len = entries.len(), "Appended playlist entry");
        Ok(entries.len() - 1)
    }

    /// Remove the entry at `index`, returning it.
    #[instrument(skip(self))]
    pub fn remove(&mut self, name: &str, index: usize) -> Result<String> {
        let entries = self.entries_mut(name)?;
        check_index(name, index, entries.len())?;
        let removed = entries.remove(index);
        debug!(entry = %removed, "Removed playlist entry");
        Ok(removed)
    }

    /// Swap the entry at `index` with the one before it. Returns `false` if
    /// it already is first.
    #[instrument(skip(self))]
    pub fn move_up(&mut self, name: &str, index: usize) -> Result<bool> {
        let entries = self.entries_mut(name)?;
        check_index(name, index, entries.len())?;
        if index == 0 {
            return Ok(false);
        }
        entries.swap(index - 1, index);
        Ok(true)
    }

    /// Swap the entry at `index` with the one after it. Returns `false` if
    /// it already is last.
    #[instrument(skip(self))]
    pub fn move_down(&mut self, name: &str, index: usize) -> Result<bool> {
        let entries = self.entries_mut(name)?;
        check_index(name, index, entries.len())?;
        if index + 1 == entries.len() {
            return Ok(false);
        }
        entries.swap(index, index + 1);
        Ok(true)
    }
}

fn not_found(name: &str) -> UdsmError {
    UdsmError::PlaylistNotFound {
        name: name.to_string(),
    }
}

fn check_index(name: &str, index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(UdsmError::PlaylistIndex {
            name: name.to_string(),
            index,
            len,
        })
    }
}
