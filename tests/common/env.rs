//! Process environment overrides for in-process tests.
//!
//! `HOME` decides where `~` and the default live save paths point, so tests
//! that touch it hold the process-wide env lock until the guard drops.

use env_lock::{EnvGuard, lock_env};
use tracing::trace;

/// Point `HOME` at `dir` until the returned guard is dropped.
#[must_use]
pub fn with_home(dir: &str) -> EnvGuard<'static> {
    trace!(dir, "Overriding HOME");
    lock_env([("HOME", Some(dir))])
}
