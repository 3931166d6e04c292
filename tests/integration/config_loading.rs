//! Integration tests for configuration files and the data folder layout.

use std::fs;
use std::path::{Path, PathBuf};

use udsm::config::{
    AppPaths, Config, ConfigFormat, load_config, load_config_from_str, load_or_default,
    save_config,
};
use udsm::error::UdsmError;
use udsm::game::Game;

use crate::common::env::with_home;
use crate::common::fixtures::Sandbox;

#[test]
fn yaml_and_json_files_load_like_toml() {
    let sb = Sandbox::new();
    let yaml = sb.scratch("config.yml");
    fs::create_dir_all(yaml.parent().unwrap()).unwrap();
    fs::write(
        &yaml,
        "undertale_save_path: /saves/UNDERTALE\nplaylists:\n  Neutral:\n    - Ruins\n    - Hotland\n",
    )
    .unwrap();
    let json = sb.scratch("config.json");
    fs::write(
        &json,
        r#"{"undertale_save_path": "/saves/UNDERTALE", "playlists": {"Neutral": ["Ruins", "Hotland"]}}"#,
    )
    .unwrap();

    let from_yaml = load_config(&yaml).unwrap();
    let from_json = load_config(&json).unwrap();
    assert_eq!(from_yaml, from_json);
    assert_eq!(
        from_yaml.save_path(Game::Undertale),
        Some(PathBuf::from("/saves/UNDERTALE"))
    );
    assert_eq!(from_yaml.playlists.get("Neutral").unwrap(), ["Ruins", "Hotland"]);
}

#[test]
fn legacy_keys_are_dropped_on_save() {
    let sb = Sandbox::new();
    let legacy = r#"{
        "undertale_saves": ["Ruins", "Snowdin"],
        "deltarune_saves": ["Field"],
        "deltarune_proc_name": "DELTARUNE.exe",
        "geometry": [10, 10, 800, 600]
    }"#;
    let config = load_config_from_str(legacy, ConfigFormat::Json).unwrap();
    assert_eq!(config.proc_name(Game::Deltarune), "DELTARUNE.exe");

    let path = sb.paths.config_file();
    save_config(&config, &path).unwrap();
    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("deltarune_proc_name"));
    assert!(!written.contains("undertale_saves"));
    assert!(!written.contains("geometry"));
}

#[test]
fn unknown_extension_is_rejected() {
    let sb = Sandbox::new();
    let path = sb.scratch("config.ini");
    assert!(matches!(
        save_config(&Config::default(), &path),
        Err(UdsmError::ConfigParse(_))
    ));
    assert!(!path.exists());
}

#[test]
fn broken_file_falls_back_to_defaults() {
    let sb = Sandbox::new();
    let path = sb.paths.config_file();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "playlists = \"not a table\"").unwrap();

    assert!(matches!(load_config(&path), Err(UdsmError::ConfigParse(_))));
    assert_eq!(load_or_default(&path), Config::default());
    // The broken file is left for the user to inspect.
    assert!(path.exists());
}

#[test]
fn unknown_scalar_key_is_an_error() {
    let mut config = Config::default();
    assert!(matches!(
        config.set("playlists", "x"),
        Err(UdsmError::UnknownConfigKey { .. })
    ));
    assert!(matches!(
        config.get("window_geometry"),
        Err(UdsmError::UnknownConfigKey { .. })
    ));
}

#[test]
fn layout_lives_under_the_root() {
    let sb = Sandbox::new();
    sb.paths.ensure_layout().unwrap();

    let root = sb.paths.root();
    assert_eq!(sb.paths.config_file(), root.join("config.toml"));
    assert_eq!(sb.paths.log_file(), root.join("latest.log"));
    for dir in ["undertale_saves", "deltarune_saves", "backups"] {
        assert!(root.join(dir).is_dir(), "{dir} missing");
    }
    assert_eq!(sb.store.collection_dir(Game::Undertale), root.join("undertale_saves"));
}

#[test]
fn tilde_paths_follow_home() {
    let sb = Sandbox::new();
    let home = sb.scratch("home");
    let _guard = with_home(&home.display().to_string());

    let mut config = Config::default();
    config.set("undertale_save_path", "~/.config/UNDERTALE").unwrap();
    assert_eq!(
        config.save_path(Game::Undertale),
        Some(home.join(".config").join("UNDERTALE"))
    );

    let paths = AppPaths::resolve(Some(Path::new("~/udsm"))).unwrap();
    assert_eq!(paths.root(), home.join("udsm"));
}

#[cfg(target_os = "linux")]
#[test]
fn default_save_paths_on_linux() {
    let sb = Sandbox::new();
    let home = sb.scratch("home");
    let _guard = with_home(&home.display().to_string());

    let config = Config::default();
    assert_eq!(
        config.save_path(Game::Undertale),
        Some(home.join(".config").join("UNDERTALE"))
    );
    assert_eq!(config.save_path(Game::Deltarune), None);
}
