//! CLI argument definitions.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use crate::game::Game;
use crate::process::LaunchMode;

/// UNDERTALE / DELTARUNE save manager.
///
/// Keeps named copies ("SAVEs") of each game's save folder, swaps them into
/// place with a backup of whatever was there, and plays lists of them back
/// to back.
///
/// Robot Mode: Use --robot or --format=json for machine-parseable output.
#[derive(Parser, Debug)]
#[command(name = "udsm", version, about, long_about = None)]
#[command(propagate_version = true)]
#[allow(clippy::struct_excessive_bools)] // CLI flags naturally use multiple bools
pub struct Cli {
    /// Output format (text for humans, json for agents/scripts)
    #[arg(
        long,
        short = 'f',
        default_value = "text",
        global = true,
        env = "UDSM_FORMAT"
    )]
    pub format: OutputFormat,

    /// Robot mode: equivalent to --format=json
    #[arg(long, global = true)]
    pub robot: bool,

    /// Verbose output (-v debug, -vv trace)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Application data directory (config, SAVEs, backups, log)
    #[arg(long, global = true, env = "UDSM_HOME", value_name = "DIR")]
    pub home: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output format selection.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text with optional color
    #[default]
    Text,
    /// JSON output for scripts and agents
    Json,
    /// Compact JSON (single line)
    JsonCompact,
}

impl Cli {
    /// Returns true if output should be JSON (robot mode or explicit --format=json).
    pub const fn use_json(&self) -> bool {
        self.robot || matches!(self.format, OutputFormat::Json | OutputFormat::JsonCompact)
    }

    /// Returns true if output should be compact JSON.
    pub const fn use_compact_json(&self) -> bool {
        matches!(self.format, OutputFormat::JsonCompact)
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    // === Setup ===
    /// Create the data directory layout and a default configuration
    Init(InitArgs),

    // === SAVEs ===
    /// List SAVEs of one or both games
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Snapshot a save folder as a new SAVE
    Create(CreateArgs),

    /// Rename a SAVE
    Rename(RenameArgs),

    /// Delete a SAVE
    #[command(visible_alias = "rm")]
    Delete(DeleteArgs),

    /// Replace the live save with a SAVE (the live save is backed up)
    Apply(ApplyArgs),

    /// Import a tree of premade SAVEs (<game>/<category>/<save>)
    Import(ImportArgs),

    // === Backups ===
    /// List backups of replaced live saves
    Backups,

    /// Open the backup folder in the file browser
    OpenBackups,

    // === Games ===
    /// Start a game
    Launch(LaunchArgs),

    // === Playlists ===
    /// Manage and play playlists
    #[command(subcommand)]
    Playlist(PlaylistCommand),

    // === Configuration ===
    /// Show or change configuration
    #[command(subcommand)]
    Config(ConfigCommand),

    // === Utilities ===
    /// Show version and build information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// === Argument Structs ===

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Overwrite an existing configuration with defaults
    #[arg(long)]
    pub force: bool,
}

#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Only list this game
    #[arg(long, short = 'g')]
    pub game: Option<Game>,
}

#[derive(Parser, Debug)]
pub struct CreateArgs {
    /// Game the SAVE belongs to
    #[arg(long, short = 'g')]
    pub game: Game,

    /// Name of the new SAVE
    pub name: String,

    /// Folder to copy (defaults to the configured live save path)
    #[arg(long, value_name = "DIR")]
    pub from: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct RenameArgs {
    /// Game of the SAVE (looked up by name when omitted)
    #[arg(long, short = 'g')]
    pub game: Option<Game>,

    /// Current name
    pub old: String,

    /// New name
    pub new: String,
}

#[derive(Parser, Debug)]
pub struct DeleteArgs {
    /// Game of the SAVE (looked up by name when omitted)
    #[arg(long, short = 'g')]
    pub game: Option<Game>,

    /// SAVE to delete
    pub name: String,

    /// Do not ask for confirmation
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(Parser, Debug)]
pub struct ApplyArgs {
    /// Game of the SAVE (looked up by name when omitted)
    #[arg(long, short = 'g')]
    pub game: Option<Game>,

    /// SAVE to apply
    pub name: String,

    /// Apply even if the live save path does not look like the game's
    #[arg(long)]
    pub force: bool,

    /// Start the game afterwards
    #[arg(long)]
    pub launch: bool,

    /// How to start the game with --launch
    #[arg(long, default_value = "steam")]
    pub mode: LaunchMode,
}

#[derive(Parser, Debug)]
pub struct ImportArgs {
    /// Root of the premade SAVE tree
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Only import saves whose game or category folder has this name
    #[arg(long)]
    pub filter: Option<String>,
}

#[derive(Parser, Debug)]
pub struct LaunchArgs {
    /// Game to start
    pub game: Game,

    /// Through Steam or by running the configured executable
    #[arg(long, default_value = "steam")]
    pub mode: LaunchMode,
}

/// Playlist subcommands. Entry indices are 0-based.
#[derive(Subcommand, Debug)]
pub enum PlaylistCommand {
    /// List playlists
    #[command(visible_alias = "ls")]
    List,

    /// Show the entries of a playlist
    Show { name: String },

    /// Create an empty playlist
    New {
        /// Name (defaults to "New Playlist", "New Playlist 2", ...)
        name: Option<String>,
    },

    /// Rename a playlist
    Rename { old: String, new: String },

    /// Delete a playlist
    #[command(visible_alias = "rm")]
    Delete {
        name: String,
        /// Do not ask for confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Append a SAVE to a playlist
    Add { name: String, save: String },

    /// Remove an entry by index
    Remove { name: String, index: usize },

    /// Move an entry one place towards the start
    Up { name: String, index: usize },

    /// Move an entry one place towards the end
    Down { name: String, index: usize },

    /// Play a playlist until it finishes or Ctrl-C
    Play(PlayArgs),
}

#[derive(Parser, Debug)]
pub struct PlayArgs {
    /// Playlist to play
    pub name: String,

    /// How each game is started
    #[arg(long, default_value = "steam")]
    pub mode: LaunchMode,

    /// Seconds to wait after each launch before the next entry
    #[arg(long, default_value = "10", value_name = "SECS")]
    pub cooldown: u64,

    /// Play even if a live save path does not look like the game's
    #[arg(long)]
    pub force: bool,
}

/// Configuration subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the whole configuration
    Show,

    /// Print one value
    Get { key: String },

    /// Change one value (an empty value unsets a path)
    Set { key: String, value: String },

    /// Print the configuration file path
    Path,
}

#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
