//! Human-mode end-to-end tests.

use crate::common::assertions::{assert_contains_all, assert_no_ansi};
use crate::common::cli::CliRunner;
use crate::common::fixtures::{UNDERTALE_FILES, write_tree};
use crate::common::init_test_logging;

#[test]
fn quick_start_lists_commands() {
    init_test_logging();
    let cli = CliRunner::new();
    let result = cli.run(&[]);
    let _ = result.assert_success();
    assert_contains_all(&result.stdout, &["QUICK START", "udsm init", "udsm playlist play"]);
    assert_no_ansi(&result.stdout);
}

#[test]
fn list_shows_both_games() {
    let cli = CliRunner::new();
    let src = cli.outside("src");
    write_tree(&src, UNDERTALE_FILES);
    let _ = cli
        .run(&["create", "-g", "undertale", "Ruins", "--from", &src.to_string_lossy()])
        .assert_success()
        .assert_stdout_contains("[OK] Created UNDERTALE SAVE 'Ruins'");

    let result = cli.run(&["list"]);
    let _ = result
        .assert_success()
        .assert_stdout_contains("UNDERTALE SAVEs (1)")
        .assert_stdout_contains("  Ruins")
        .assert_stdout_contains("DELTARUNE SAVEs (0)")
        .assert_stdout_contains("(none)");
    assert_no_ansi(&result.stdout);
}

#[test]
fn errors_carry_a_hint() {
    let cli = CliRunner::new();
    let result = cli.run(&["rename", "Missing", "Other"]);
    let _ = result
        .assert_failure()
        .assert_stderr_contains("[ERR] No SAVE named 'Missing' in either game")
        .assert_stderr_contains("Hint: Run: udsm list");
    assert!(result.stdout.is_empty());
}

#[test]
fn quiet_suppresses_success_messages() {
    let cli = CliRunner::new();
    let _ = cli
        .run(&["--quiet", "playlist", "new", "Silent"])
        .assert_success()
        .assert_stdout_not_contains("[OK]");
    let _ = cli
        .run(&["playlist", "list"])
        .assert_stdout_contains("Silent")
        .assert_stdout_contains("(0 entries)");
}

#[test]
fn noop_is_a_warning_not_an_error() {
    let cli = CliRunner::new();
    let result = cli.run(&["create", "-g", "dr", "Ghost", "--from", &cli.outside("none").to_string_lossy()]);
    let _ = result
        .assert_success()
        .assert_stderr_contains("[WARN] Created DELTARUNE SAVE 'Ghost': nothing done, source does not exist");
}

#[test]
fn config_get_prints_bare_value() {
    let cli = CliRunner::new();
    let _ = cli.run(&["config", "set", "theme", "mono"]).assert_success();
    let result = cli.run(&["config", "get", "theme"]);
    let _ = result.assert_success();
    assert_eq!(result.stdout.trim(), "mono");

    let path = cli.run(&["config", "path"]);
    assert_eq!(
        path.stdout.trim(),
        cli.home().join("config.toml").display().to_string()
    );
}

#[test]
fn version_shows_build_info() {
    let cli = CliRunner::new();
    let _ = cli
        .run(&["version"])
        .assert_success()
        .assert_stdout_matches(r"^udsm \d+\.\d+\.\d+")
        .assert_stdout_contains("Git SHA")
        .assert_stdout_contains("Target");
}

#[test]
fn log_file_records_debug_detail() {
    init_test_logging();
    let cli = CliRunner::new();
    let src = cli.outside("src");
    write_tree(&src, UNDERTALE_FILES);
    let _ = cli
        .run(&["create", "-g", "ut", "Logged", "--from", &src.to_string_lossy()])
        .assert_success();

    // RUST_LOG=off only silences stderr.
    let log = cli.log_contents();
    assert_contains_all(&log, &["Created snapshot", "DEBUG", "udsm::store"]);
    assert_no_ansi(&log);

    // Each run starts a fresh log.
    let _ = cli.run(&["list"]).assert_success();
    assert!(!cli.log_contents().contains("Created snapshot"));
}
