//! Integration tests for playlists stored in the configuration file.

use udsm::config::{Config, load_config, save_config};
use udsm::error::UdsmError;
use udsm::game::Game;
use udsm::playlist::{DEFAULT_PLAYLIST_NAME, Playlists};

use crate::common::fixtures::{Sandbox, UNDERTALE_FILES};

fn edited_book() -> Playlists {
    let mut book = Playlists::default();
    let first = book.create();
    assert_eq!(first, DEFAULT_PLAYLIST_NAME);
    book.append(&first, "Ruins").unwrap();
    book.append(&first, "Snowdin").unwrap();
    book.append(&first, "Ruins").unwrap();

    book.create_named("Chapter 2").unwrap();
    book.append("Chapter 2", "Cyber City").unwrap();
    book
}

#[test]
fn playlists_survive_every_config_format() {
    let sb = Sandbox::new();
    let mut config = Config::default();
    config.playlists = edited_book();

    for file in ["config.toml", "config.yaml", "config.json"] {
        let path = sb.scratch(file);
        save_config(&config, &path).unwrap();
        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded.playlists, config.playlists, "{file}");
        assert_eq!(
            loaded.playlists.get(DEFAULT_PLAYLIST_NAME).unwrap(),
            ["Ruins", "Snowdin", "Ruins"]
        );
    }
}

#[test]
fn entry_order_is_preserved_after_moves() {
    let sb = Sandbox::new();
    let mut config = Config::default();
    config.playlists = edited_book();

    let book = &mut config.playlists;
    assert!(book.move_down(DEFAULT_PLAYLIST_NAME, 0).unwrap());
    assert!(!book.move_down(DEFAULT_PLAYLIST_NAME, 2).unwrap());
    assert_eq!(book.remove(DEFAULT_PLAYLIST_NAME, 2).unwrap(), "Ruins");

    let path = sb.paths.config_file();
    save_config(&config, &path).unwrap();
    let loaded = load_config(&path).unwrap();
    assert_eq!(
        loaded.playlists.get(DEFAULT_PLAYLIST_NAME).unwrap(),
        ["Snowdin", "Ruins"]
    );
}

#[test]
fn names_are_unique_ignoring_case() {
    let mut book = edited_book();
    assert!(matches!(
        book.create_named("chapter 2"),
        Err(UdsmError::PlaylistExists { .. })
    ));
    assert!(matches!(
        book.rename("Chapter 2", "NEW PLAYLIST"),
        Err(UdsmError::PlaylistExists { .. })
    ));
    // The default name skips over taken names regardless of case.
    book.create_named("new playlist 2").unwrap();
    assert_eq!(book.create(), "New Playlist 3");
}

#[test]
fn index_errors_name_the_playlist() {
    let mut book = edited_book();
    let err = book.move_up("Chapter 2", 1).unwrap_err();
    assert!(matches!(
        &err,
        UdsmError::PlaylistIndex { name, index: 1, len: 1 } if name == "Chapter 2"
    ));
    assert!(err.to_string().contains("Chapter 2"));
    assert_eq!(book.get("Chapter 2").unwrap(), ["Cyber City"]);
}

#[test]
fn entries_outlive_the_saves_they_name() {
    let sb = Sandbox::new();
    sb.snapshot(Game::Undertale, "Ruins", UNDERTALE_FILES);
    let mut book = edited_book();

    assert!(sb.store.rename(Game::Undertale, "Ruins", "Ruins (old)").unwrap().is_success());
    assert!(sb.store.delete(Game::Undertale, "Ruins (old)").is_success());

    assert_eq!(
        book.entries(DEFAULT_PLAYLIST_NAME).unwrap(),
        ["Ruins", "Snowdin", "Ruins"]
    );
    assert_eq!(book.delete("Chapter 2").unwrap(), ["Cyber City"]);
    assert_eq!(book.names().collect::<Vec<_>>(), [DEFAULT_PLAYLIST_NAME]);
}
