//! Error types for save manager operations.
//!
//! Only validation problems surface as errors. Filesystem races inside the
//! snapshot store and backup archiver are reported as status values instead
//! (see [`crate::store::OpStatus`]).

use thiserror::Error;

use crate::game::Game;

/// Primary error type for save manager operations.
#[derive(Error, Debug)]
pub enum UdsmError {
    // Snapshot name validation
    #[error("SAVE name must not be empty")]
    EmptyName,

    #[error("A SAVE named '{name}' already exists")]
    DuplicateName { name: String },

    #[error("Invalid SAVE name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("No {game} SAVE named '{name}'")]
    SnapshotNotFound { game: Game, name: String },

    #[error("No SAVE named '{name}' in either game")]
    UnknownSnapshot { name: String },

    // Path configuration
    #[error("No {game} SAVE path set")]
    MissingSavePath { game: Game },

    #[error("No {game} file path set")]
    MissingFilePath { game: Game },

    #[error("{game} SAVE path '{path}' does not end with '{expected}'")]
    SuspiciousSavePath {
        game: Game,
        path: String,
        expected: &'static str,
    },

    // Playlists
    #[error("Playlist not found: {name}")]
    PlaylistNotFound { name: String },

    #[error("A playlist named '{name}' already exists")]
    PlaylistExists { name: String },

    #[error("Playlist name must not be empty")]
    EmptyPlaylistName,

    #[error("Playlist '{name}' has no entry {index} (length {len})")]
    PlaylistIndex {
        name: String,
        index: usize,
        len: usize,
    },

    #[error("A playlist run is already in progress")]
    RunInProgress,

    // Configuration errors
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    #[error("Configuration parse error: {0}")]
    ConfigParse(String),

    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    #[error("Unknown configuration key: {key}")]
    UnknownConfigKey { key: String },

    #[error("Confirmation required, pass --yes to proceed")]
    ConfirmationRequired,

    // General errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl UdsmError {
    /// Returns true if the error is recoverable by the user.
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::EmptyName
                | Self::DuplicateName { .. }
                | Self::InvalidName { .. }
                | Self::SnapshotNotFound { .. }
                | Self::UnknownSnapshot { .. }
                | Self::MissingSavePath { .. }
                | Self::MissingFilePath { .. }
                | Self::SuspiciousSavePath { .. }
                | Self::PlaylistNotFound { .. }
                | Self::PlaylistExists { .. }
                | Self::EmptyPlaylistName
                | Self::PlaylistIndex { .. }
                | Self::UnknownConfigKey { .. }
                | Self::ConfirmationRequired
        )
    }

    /// Returns a suggestion for how to fix the error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::EmptyName | Self::DuplicateName { .. } | Self::InvalidName { .. } => {
                Some("Please give your SAVE a unique name")
            }
            Self::UnknownSnapshot { .. } | Self::SnapshotNotFound { .. } => {
                Some("Run: udsm list")
            }
            Self::MissingSavePath { game } => Some(match game {
                Game::Undertale => "Run: udsm config set undertale_save_path <DIR>",
                Game::Deltarune => "Run: udsm config set deltarune_save_path <DIR>",
            }),
            Self::MissingFilePath { game } => Some(match game {
                Game::Undertale => "Run: udsm config set undertale_file_path <EXE>",
                Game::Deltarune => "Run: udsm config set deltarune_file_path <EXE>",
            }),
            Self::SuspiciousSavePath { .. } => {
                Some("Check the configured SAVE path, or pass --force")
            }
            Self::PlaylistNotFound { .. } => Some("Run: udsm playlist list"),
            Self::PlaylistIndex { .. } => Some("Run: udsm playlist show <NAME>"),
            Self::ConfigNotFound { .. } => Some("Run: udsm init"),
            Self::UnknownConfigKey { .. } => Some("Run: udsm config show"),
            _ => None,
        }
    }
}

/// Convenience type alias for Results using UdsmError.
pub type Result<T> = std::result::Result<T, UdsmError>;

/// Extension trait for adding context to errors.
pub trait ResultExt<T> {
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T, E: std::error::Error> ResultExt<T> for std::result::Result<T, E> {
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| UdsmError::Other(format!("{}: {e}", f().into())))
    }
}
