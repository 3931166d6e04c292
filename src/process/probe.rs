//! System process probe backed by `sysinfo`.

use std::ffi::OsStr;
use std::sync::Mutex;

use sysinfo::{ProcessRefreshKind, ProcessStatus, ProcessesToUpdate, System};
use tracing::{trace, warn};

use super::ProcessProbe;

/// Looks processes up by exact name in a refreshed process table.
///
/// Zombies are ignored: an exited game nobody has reaped yet is not running.
pub struct SysinfoProbe {
    system: Mutex<System>,
}

impl Default for SysinfoProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl SysinfoProbe {
    pub fn new() -> Self {
        Self {
            system: Mutex::new(System::new()),
        }
    }
}

impl ProcessProbe for SysinfoProbe {
    fn is_running(&self, name: &str) -> bool {
        if name.is_empty() {
            return false;
        }
        let Ok(mut system) = self.system.lock() else {
            warn!("Process table lock poisoned, reporting not running");
            return false;
        };
        system.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing(),
        );
        let running = system
            .processes_by_exact_name(OsStr::new(name))
            .any(|process| process.status() != ProcessStatus::Zombie);
        trace!(name, running, "Probed process");
        running
    }
}
