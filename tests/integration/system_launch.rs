//! Integration tests for the real launcher and process probe.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::thread;
use std::time::{Duration, Instant};

use tempfile::TempDir;
use udsm::game::Game;
use udsm::process::{LaunchRequest, Launcher, ProcessProbe, SysinfoProbe, SystemLauncher};

use crate::common::init_test_logging;

#[test]
fn exited_game_is_no_longer_running() {
    init_test_logging();
    let temp = TempDir::new().unwrap();
    let exe = temp.path().join("udsm-quickexit");
    fs::write(&exe, "#!/bin/sh\nexit 0\n").unwrap();
    fs::set_permissions(&exe, fs::Permissions::from_mode(0o755)).unwrap();

    let launcher = SystemLauncher::new();
    launcher.launch(&LaunchRequest::file(Game::Undertale, &exe));
    launcher.join_pending();

    let probe = SysinfoProbe::new();
    let deadline = Instant::now() + Duration::from_secs(10);
    while probe.is_running("udsm-quickexit") {
        assert!(
            Instant::now() < deadline,
            "udsm-quickexit still reported running after it exited"
        );
        thread::sleep(Duration::from_millis(100));
    }
}
