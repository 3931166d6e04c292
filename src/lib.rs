//! UNDERTALE / DELTARUNE save manager library.
//!
//! This library exposes the core of the `udsm` CLI for use in tests and
//! other front ends.
//!
//! # Modules
//!
//! - `store`: SAVE snapshots, apply with backup, premade imports
//! - `playlist`: Playlist collection and the runner state machine
//! - `process`: Process probing and game launching
//! - `config`: Configuration file and data directory layout
//! - `error`: Error types with user-recoverable hints
//! - `output`: Output mode abstraction (robot/human)
#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod game;
pub mod logging;
pub mod output;
pub mod playlist;
pub mod process;
pub mod store;
pub mod theme;
