//! Integration tests for backups taken by apply.

use std::collections::BTreeMap;
use std::fs;

use udsm::game::Game;
use udsm::store::{BackupArchiver, BackupOutcome, OpStatus};

use crate::common::assertions::{assert_backup_name, assert_dir_missing};
use crate::common::fixtures::{DELTARUNE_FILES, Sandbox, UNDERTALE_FILES, read_tree, write_tree};
use crate::common::init_test_logging;

#[test]
fn backup_is_named_after_game_and_applied_save() {
    init_test_logging();
    let sb = Sandbox::new();
    sb.snapshot(Game::Undertale, "Waterfall", UNDERTALE_FILES);
    let live = sb.live(Game::Undertale);
    write_tree(&live, &[("file0", "old")]);

    let report = sb.store.apply(Game::Undertale, "Waterfall", &live);
    assert!(report.status.is_success());

    let backups = sb.store.archiver().list();
    assert_eq!(backups.len(), 1);
    assert_backup_name(&backups[0], "UNDERTALE", "Waterfall");
    assert_eq!(
        report.backup.archived_path().unwrap(),
        sb.paths.backups_dir().join(&backups[0])
    );
}

#[test]
fn repeated_applies_keep_every_backup() {
    let sb = Sandbox::new();
    sb.snapshot(Game::Deltarune, "Card Castle", DELTARUNE_FILES);
    let live = sb.live(Game::Deltarune);

    for round in 0..3 {
        write_tree(&live, &[("marker", &format!("round {round}"))]);
        let report = sb.store.apply(Game::Deltarune, "Card Castle", &live);
        assert_eq!(report.status, OpStatus::Success);
    }

    let backups = sb.store.archiver().list();
    assert_eq!(backups.len(), 3);
    for name in &backups {
        assert_backup_name(name, "DELTARUNE", "Card Castle");
    }

    // Every round's live save survives in exactly one backup.
    let mut markers: Vec<String> = backups
        .iter()
        .map(|b| {
            let tree = read_tree(&sb.paths.backups_dir().join(b));
            tree.get("marker").cloned().unwrap_or_default()
        })
        .filter(|m| !m.is_empty())
        .collect();
    markers.sort();
    assert_eq!(markers, ["round 0", "round 1", "round 2"]);
}

#[test]
fn archive_without_live_save_leaves_no_backup_root() {
    let sb = Sandbox::new();
    let archiver = BackupArchiver::new(sb.paths.backups_dir());
    let outcome = archiver.archive(Game::Undertale, "Ruins", &sb.live(Game::Undertale));

    assert_eq!(outcome, BackupOutcome::NothingToArchive);
    assert_dir_missing(archiver.root());
}

#[test]
fn list_ignores_stray_files() {
    let sb = Sandbox::new();
    let root = sb.paths.backups_dir();
    fs::create_dir_all(root.join("UNDERTALE_a_2020-01-01_00-00-00")).unwrap();
    fs::write(root.join("notes.txt"), "hi").unwrap();

    let archiver = BackupArchiver::new(&root);
    assert_eq!(archiver.list(), ["UNDERTALE_a_2020-01-01_00-00-00"]);
}

#[test]
fn unwritable_backup_root_abandons_apply() {
    init_test_logging();
    let sb = Sandbox::new();
    sb.snapshot(Game::Undertale, "Core", UNDERTALE_FILES);
    let live = sb.live(Game::Undertale);
    write_tree(&live, &[("file0", "keep me")]);
    // A plain file where the backup folder should be.
    fs::write(sb.paths.backups_dir(), "not a folder").unwrap();

    let report = sb.store.apply(Game::Undertale, "Core", &live);
    assert!(matches!(report.status, OpStatus::Failed(_)), "{:?}", report.status);
    assert!(matches!(report.backup, BackupOutcome::Failed(_)));
    assert_eq!(read_tree(&live), BTreeMap::from([("file0".to_string(), "keep me".to_string())]));

    let siblings: Vec<_> = fs::read_dir(live.parent().unwrap())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(siblings, ["UNDERTALE"]);
}
