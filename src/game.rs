//! The two supported games and everything keyed off them.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// A game whose saves are managed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Game {
    /// UNDERTALE (Steam app 391540)
    #[value(alias = "ut")]
    Undertale,
    /// DELTARUNE (Steam app 1671210)
    #[value(alias = "dr")]
    Deltarune,
}

impl Game {
    pub const ALL: [Self; 2] = [Self::Undertale, Self::Deltarune];

    /// Lowercase identifier used in config keys and directory names.
    pub const fn id(self) -> &'static str {
        match self {
            Self::Undertale => "undertale",
            Self::Deltarune => "deltarune",
        }
    }

    /// Name as the games themselves write it.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Undertale => "UNDERTALE",
            Self::Deltarune => "DELTARUNE",
        }
    }

    /// Directory (under the app root) holding this game's snapshots.
    pub const fn saves_dir_name(self) -> &'static str {
        match self {
            Self::Undertale => "undertale_saves",
            Self::Deltarune => "deltarune_saves",
        }
    }

    /// Prefix of backup directory names.
    pub const fn backup_prefix(self) -> &'static str {
        self.display_name()
    }

    pub const fn steam_app_id(self) -> u32 {
        match self {
            Self::Undertale => 391_540,
            Self::Deltarune => 1_671_210,
        }
    }

    pub fn steam_url(self) -> String {
        format!("steam://rungameid/{}", self.steam_app_id())
    }

    /// Default live save location for the current platform, if the game has one.
    pub fn default_save_path(self) -> Option<PathBuf> {
        let home = dirs::home_dir()?;
        let path = if cfg!(target_os = "windows") {
            home.join("AppData").join("Local").join(self.display_name())
        } else if cfg!(target_os = "macos") {
            home.join("Library")
                .join("Application Support")
                .join(format!("com.tobyfox.{}", self.id()))
        } else if cfg!(target_os = "linux") {
            // DELTARUNE has no native Linux build.
            match self {
                Self::Undertale => home.join(".config").join("UNDERTALE"),
                Self::Deltarune => return None,
            }
        } else {
            return None;
        };
        Some(path)
    }

    /// Default process name the game runs under.
    pub fn default_proc_name(self) -> String {
        if cfg!(target_os = "windows") {
            format!("{}.exe", self.display_name())
        } else {
            self.display_name().to_string()
        }
    }

    /// The live save directory name is expected to end with the game name;
    /// anything else is probably a misconfigured path.
    pub fn is_plausible_save_path(self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.to_lowercase().ends_with(self.id()))
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Game {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "undertale" | "ut" => Ok(Self::Undertale),
            "deltarune" | "dr" => Ok(Self::Deltarune),
            other => Err(format!("unknown game '{other}': expected undertale or deltarune")),
        }
    }
}
