//! Launching games and opening folders on a background thread.

use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver};
use std::thread;

use tracing::{debug, info, warn};

use super::{LaunchRequest, Launcher};

/// Build the platform command that opens a URL or path with its default
/// handler.
pub fn opener_command(target: &OsStr) -> Command {
    let mut cmd = if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", ""]);
        cmd
    } else if cfg!(target_os = "macos") {
        Command::new("open")
    } else {
        Command::new("xdg-open")
    };
    cmd.arg(target);
    cmd
}

/// Launcher that spawns real processes.
///
/// Each launch runs on its own thread, which starts the child and then waits
/// on it so an exited game does not linger as a zombie that still shows up
/// in the process table. Dropping the launcher only waits until every launch
/// has been handed to the OS, never for the games themselves.
#[derive(Debug, Default)]
pub struct SystemLauncher {
    pending: Mutex<Vec<Receiver<()>>>,
}

impl SystemLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    fn spawn_detached(&self, label: String, mut cmd: Command) {
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        let (handed_off, receiver) = mpsc::channel();
        let spawned = thread::Builder::new()
            .name("udsm-launch".to_string())
            .spawn(move || {
                let mut child = match cmd.spawn() {
                    Ok(child) => child,
                    Err(e) => {
                        warn!(target_name = %label, error = %e, "Failed to start");
                        let _ = handed_off.send(());
                        return;
                    }
                };
                info!(target_name = %label, pid = child.id(), "Started");
                let _ = handed_off.send(());
                match child.wait() {
                    Ok(status) => debug!(target_name = %label, %status, "Exited"),
                    Err(e) => warn!(target_name = %label, error = %e, "Failed to wait for exit"),
                }
            });
        match spawned {
            Ok(_detached) => {
                if let Ok(mut pending) = self.pending.lock() {
                    pending.push(receiver);
                }
            }
            Err(e) => warn!(error = %e, "Failed to spawn launch thread"),
        }
    }

    /// Wait until every launch issued so far has been handed to the OS.
    pub fn join_pending(&self) {
        let receivers = match self.pending.lock() {
            Ok(mut pending) => std::mem::take(&mut *pending),
            Err(_) => return,
        };
        for receiver in receivers {
            // A dropped sender means the thread ended before signalling.
            if receiver.recv().is_err() {
                warn!("Launch thread ended without starting its process");
            }
        }
    }
}

impl Drop for SystemLauncher {
    fn drop(&mut self) {
        self.join_pending();
    }
}

impl Launcher for SystemLauncher {
    fn launch(&self, request: &LaunchRequest) {
        match request {
            LaunchRequest::Steam { game, url } => {
                debug!(%game, url, "Launching via Steam");
                self.spawn_detached(url.clone(), opener_command(OsStr::new(url)));
            }
            LaunchRequest::File { game, path } => {
                debug!(%game, path = %path.display(), "Launching executable");
                let mut cmd = Command::new(path);
                if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                    cmd.current_dir(dir);
                }
                self.spawn_detached(path.display().to_string(), cmd);
            }
        }
    }

    fn open(&self, path: &Path) {
        debug!(path = %path.display(), "Opening folder");
        self.spawn_detached(
            path.display().to_string(),
            opener_command(path.as_os_str()),
        );
    }
}
