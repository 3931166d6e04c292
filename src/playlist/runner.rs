//! The playlist runner state machine.
//!
//! A run applies each queued SAVE to its game's live save directory and
//! launches the game, then waits until neither game is running and the
//! cooldown has elapsed before moving to the next entry.
//!
//! ```text
//! Idle ──start──▶ Armed ──tick──▶ WaitingForSlot ⇄ Advancing
//!                   │                   │
//!                   └──cancel──▶ Finished ◀──queue empty / cancel
//! ```
//!
//! The runner never sleeps or blocks. The caller drives it with
//! [`PlaylistRunner::tick`] every [`TICK_INTERVAL`], passing the wall time
//! that actually elapsed.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::config::Config;
use crate::error::{Result, UdsmError};
use crate::game::Game;
use crate::process::{LaunchMode, LaunchRequest, Launcher, ProcessProbe};
use crate::store::{ApplyReport, SnapshotStore};

/// How often the runner expects to be ticked.
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Dwell time enforced after each advance.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(10);

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Completed,
    Cancelled,
}

/// Lifecycle state of a [`PlaylistRunner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum RunState {
    #[default]
    Idle,
    Armed,
    WaitingForSlot,
    Advancing,
    Finished(FinishReason),
}

impl RunState {
    /// Started and not yet finished.
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Armed | Self::WaitingForSlot | Self::Advancing)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Finished(_))
    }
}

/// What a single tick did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TickEvent {
    /// The runner is idle or already finished.
    Inert,
    /// A game is running or the cooldown has not elapsed.
    Waiting {
        game_running: bool,
        #[serde(with = "duration_millis")]
        cooldown: Duration,
    },
    /// An entry was applied. Its game is launched only when the apply
    /// succeeded; `launch` is `None` otherwise.
    Advanced {
        entry: String,
        report: ApplyReport,
        launch: Option<LaunchRequest>,
    },
    /// An entry named a SAVE neither game has.
    Skipped { entry: String },
    /// The queue ran out.
    Finished,
}

/// Per-game targets of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameTarget {
    pub save_path: Option<PathBuf>,
    pub file_path: Option<PathBuf>,
    pub proc_name: String,
}

/// Everything a run needs from the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub launch_mode: LaunchMode,
    pub cooldown: Duration,
    pub undertale: GameTarget,
    pub deltarune: GameTarget,
}

impl RunSettings {
    pub fn from_config(config: &Config, launch_mode: LaunchMode) -> Self {
        let target = |game| GameTarget {
            save_path: config.save_path(game),
            file_path: config.file_path(game),
            proc_name: config.proc_name(game).to_string(),
        };
        Self {
            launch_mode,
            cooldown: DEFAULT_COOLDOWN,
            undertale: target(Game::Undertale),
            deltarune: target(Game::Deltarune),
        }
    }

    #[must_use]
    pub const fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub const fn target(&self, game: Game) -> &GameTarget {
        match game {
            Game::Undertale => &self.undertale,
            Game::Deltarune => &self.deltarune,
        }
    }

    fn launch_request(&self, game: Game) -> Option<LaunchRequest> {
        match self.launch_mode {
            LaunchMode::Steam => Some(LaunchRequest::steam(game)),
            LaunchMode::File => self
                .target(game)
                .file_path
                .clone()
                .map(|path| LaunchRequest::file(game, path)),
        }
    }
}

/// Drives one playlist run at a time.
pub struct PlaylistRunner<'a> {
    store: &'a SnapshotStore,
    probe: &'a dyn ProcessProbe,
    launcher: &'a dyn Launcher,
    settings: RunSettings,
    state: RunState,
    queue: VecDeque<String>,
    current: Option<String>,
    cooldown: Duration,
}

impl<'a> PlaylistRunner<'a> {
    pub fn new(
        store: &'a SnapshotStore,
        probe: &'a dyn ProcessProbe,
        launcher: &'a dyn Launcher,
        settings: RunSettings,
    ) -> Self {
        Self {
            store,
            probe,
            launcher,
            settings,
            state: RunState::Idle,
            queue: VecDeque::new(),
            current: None,
            cooldown: Duration::ZERO,
        }
    }

    pub const fn state(&self) -> RunState {
        self.state
    }

    pub const fn settings(&self) -> &RunSettings {
        &self.settings
    }

    /// Entries not yet taken from the queue.
    pub fn remaining(&self) -> impl Iterator<Item = &str> {
        self.queue.iter().map(String::as_str)
    }

    pub fn remaining_len(&self) -> usize {
        self.queue.len()
    }

    /// The entry most recently applied.
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub const fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Load a queue and arm the runner.
    ///
    /// Every game referenced by an entry that currently exists must have a
    /// live save path, and in [`LaunchMode::File`] an executable path. On
    /// error the runner stays idle.
    #[instrument(skip(self, entries))]
    pub fn start<I, S>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.state.is_active() {
            return Err(UdsmError::RunInProgress);
        }
        let queue: VecDeque<String> = entries.into_iter().map(Into::into).collect();

        for game in Game::ALL {
            let referenced = queue.iter().any(|e| self.store.find_game(e) == Some(game));
            if !referenced {
                continue;
            }
            let target = self.settings.target(game);
            if target.save_path.is_none() {
                return Err(UdsmError::MissingSavePath { game });
            }
            if self.settings.launch_mode == LaunchMode::File && target.file_path.is_none() {
                return Err(UdsmError::MissingFilePath { game });
            }
        }

        info!(entries = queue.len(), mode = ?self.settings.launch_mode, "Playlist run armed");
        self.queue = queue;
        self.current = None;
        self.cooldown = Duration::ZERO;
        self.state = RunState::Armed;
        Ok(())
    }

    /// Drop the queue and finish. Idle or finished runners are left alone.
    pub fn cancel(&mut self) {
        if !self.state.is_active() {
            return;
        }
        info!(dropped = self.queue.len(), "Playlist run cancelled");
        self.queue.clear();
        self.state = RunState::Finished(FinishReason::Cancelled);
    }

    fn any_game_running(&self) -> bool {
        Game::ALL.into_iter().any(|game| {
            let name = &self.settings.target(game).proc_name;
            self.probe.is_running(name)
        })
    }

    /// Advance the run by `elapsed` wall time.
    pub fn tick(&mut self, elapsed: Duration) -> TickEvent {
        match self.state {
            RunState::Idle | RunState::Finished(_) => return TickEvent::Inert,
            RunState::Armed => self.state = RunState::WaitingForSlot,
            RunState::WaitingForSlot | RunState::Advancing => {}
        }

        self.cooldown = self.cooldown.saturating_sub(elapsed);
        let game_running = self.any_game_running();
        if game_running || !self.cooldown.is_zero() {
            return TickEvent::Waiting {
                game_running,
                cooldown: self.cooldown,
            };
        }

        let Some(entry) = self.queue.pop_front() else {
            info!("Playlist run completed");
            self.state = RunState::Finished(FinishReason::Completed);
            return TickEvent::Finished;
        };

        self.state = RunState::Advancing;
        let event = self.advance(entry);
        self.state = RunState::WaitingForSlot;
        event
    }

    fn advance(&mut self, entry: String) -> TickEvent {
        let Some(game) = self.store.find_game(&entry) else {
            warn!(entry = %entry, "Playlist entry matches no SAVE, skipping");
            return TickEvent::Skipped { entry };
        };

        let target = self.settings.target(game);
        // start() checked the paths, but the SAVE may have appeared since.
        let (Some(save_path), Some(launch)) =
            (target.save_path.clone(), self.settings.launch_request(game))
        else {
            warn!(entry = %entry, %game, "Game not configured for this run, skipping");
            return TickEvent::Skipped { entry };
        };

        debug!(entry = %entry, %game, "Advancing playlist");
        let report = self.store.apply(game, &entry, &save_path);
        let launch = if report.status.is_success() {
            self.launcher.launch(&launch);
            Some(launch)
        } else {
            warn!(entry = %entry, %game, "Apply did not succeed, not launching");
            None
        };
        self.cooldown = self.settings.cooldown;
        self.current = Some(entry.clone());

        TickEvent::Advanced {
            entry,
            report,
            launch,
        }
    }
}

mod duration_millis {
    use std::time::Duration;

    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }
}
