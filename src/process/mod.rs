//! Process probing and game launching.
//!
//! The playlist runner only sees the [`ProcessProbe`] and [`Launcher`]
//! traits, so it can be driven by the real system implementations or by the
//! recording mocks in [`mock`].

mod launch;
pub mod mock;
mod probe;

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::Serialize;

pub use launch::{SystemLauncher, opener_command};
pub use probe::SysinfoProbe;

use crate::game::Game;

/// Answers whether a process with an exact name is running.
///
/// Implementations must treat any enumeration failure as "not running".
pub trait ProcessProbe {
    fn is_running(&self, name: &str) -> bool;
}

/// How a game is started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LaunchMode {
    /// Through the Steam protocol handler (`steam://rungameid/<id>`)
    #[default]
    Steam,
    /// By running the configured executable directly
    File,
}

/// A single request to start a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum LaunchRequest {
    Steam { game: Game, url: String },
    File { game: Game, path: PathBuf },
}

impl LaunchRequest {
    pub fn steam(game: Game) -> Self {
        Self::Steam {
            game,
            url: game.steam_url(),
        }
    }

    pub fn file(game: Game, path: impl Into<PathBuf>) -> Self {
        Self::File {
            game,
            path: path.into(),
        }
    }

    pub const fn game(&self) -> Game {
        match self {
            Self::Steam { game, .. } | Self::File { game, .. } => *game,
        }
    }
}

/// Starts games and opens folders without waiting for them.
pub trait Launcher {
    /// Fire-and-forget launch; failures are logged, never returned.
    fn launch(&self, request: &LaunchRequest);

    /// Open a folder in the platform file browser.
    fn open(&self, path: &Path);
}
