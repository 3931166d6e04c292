//! Mock probe and launcher for tests.
//!
//! Both record what they were asked so tests can assert on it.
//!
//! # Example
//!
//! ```rust,ignore
//! use udsm::process::mock::{MockLauncher, MockProbe};
//!
//! let probe = MockProbe::new();
//! probe.set_running("UNDERTALE", true);
//! assert!(probe.is_running("UNDERTALE"));
//!
//! let launcher = MockLauncher::new();
//! launcher.launch(&LaunchRequest::steam(Game::Undertale));
//! assert_eq!(launcher.launches().len(), 1);
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::trace;

use super::{LaunchRequest, Launcher, ProcessProbe};

/// Probe whose answers are set by the test.
#[derive(Debug, Default)]
pub struct MockProbe {
    running: Mutex<HashSet<String>>,
    queries: AtomicUsize,
}

impl MockProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a process name as running or stopped.
    pub fn set_running(&self, name: &str, running: bool) {
        let mut set = self.running.lock().unwrap_or_else(PoisonError::into_inner);
        if running {
            set.insert(name.to_string());
        } else {
            set.remove(name);
        }
    }

    /// Stop every process.
    pub fn clear(&self) {
        self.running.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    /// Number of `is_running` calls so far.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

impl ProcessProbe for MockProbe {
    fn is_running(&self, name: &str) -> bool {
        self.queries.fetch_add(1, Ordering::SeqCst);
        let running = self
            .running
            .lock()
            .map(|set| set.contains(name))
            .unwrap_or(false);
        trace!(name, running, "Mock probe queried");
        running
    }
}

/// Launcher that records requests instead of starting anything.
#[derive(Debug, Default)]
pub struct MockLauncher {
    launches: Mutex<Vec<LaunchRequest>>,
    opened: Mutex<Vec<PathBuf>>,
}

impl MockLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn launches(&self) -> Vec<LaunchRequest> {
        self.launches.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn opened(&self) -> Vec<PathBuf> {
        self.opened.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Launcher for MockLauncher {
    fn launch(&self, request: &LaunchRequest) {
        trace!(?request, "Mock launch");
        self.launches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
    }

    fn open(&self, path: &Path) {
        self.opened
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path.to_path_buf());
    }
}
