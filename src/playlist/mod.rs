//! Playlists and the runner that plays them.

mod book;
mod runner;

pub use book::{DEFAULT_PLAYLIST_NAME, Playlists};
pub use runner::{
    DEFAULT_COOLDOWN, FinishReason, GameTarget, PlaylistRunner, RunSettings, RunState,
    TICK_INTERVAL, TickEvent,
};
