//! udsm - UNDERTALE / DELTARUNE save manager.
//!
//! Provides both human-friendly and script-friendly (robot mode) interfaces.
#![forbid(unsafe_code)]

use std::collections::BTreeSet;
use std::io::{self, IsTerminal};
use std::path::Path;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use console::Term;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use udsm::cli::{self, Cli, Commands, ConfigCommand, PlayArgs, PlaylistCommand};
use udsm::config::{self as cfg, AppPaths, Config};
use udsm::error::{Result, ResultExt, UdsmError};
use udsm::game::Game;
use udsm::logging;
use udsm::output::{
    OpResult, Output, OutputMode, PlaylistEntryView, RunSummary, SnapshotListing, VersionInfo,
};
use udsm::playlist::{FinishReason, PlaylistRunner, RunSettings, RunState, TICK_INTERVAL, TickEvent};
use udsm::process::{LaunchMode, LaunchRequest, Launcher, SysinfoProbe, SystemLauncher};
use udsm::store::SnapshotStore;

/// Build information embedded at compile time.
mod build_info {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");

    pub fn git_sha() -> &'static str {
        option_env!("VERGEN_GIT_SHA").unwrap_or("unknown")
    }

    pub fn git_dirty() -> bool {
        matches!(option_env!("VERGEN_GIT_DIRTY"), Some("true"))
    }

    pub fn build_timestamp() -> &'static str {
        option_env!("VERGEN_BUILD_TIMESTAMP").unwrap_or("unknown")
    }

    pub fn rustc_semver() -> &'static str {
        option_env!("VERGEN_RUSTC_SEMVER").unwrap_or("unknown")
    }

    pub fn target() -> &'static str {
        option_env!("VERGEN_CARGO_TARGET_TRIPLE").unwrap_or("unknown")
    }
}

/// Everything a command needs, set up once per invocation.
struct App<'a> {
    cli: &'a Cli,
    paths: AppPaths,
    config: Config,
    out: Box<dyn Output>,
}

impl App<'_> {
    fn store(&self) -> SnapshotStore {
        SnapshotStore::new(&self.paths)
    }

    fn save_config(&self) -> Result<()> {
        cfg::save_config(&self.config, self.paths.config_file())
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let paths = match AppPaths::resolve(cli.home.as_deref()) {
        Ok(paths) => paths,
        Err(e) => {
            OutputMode::from_cli(&cli, "").into_output().error(&e);
            return ExitCode::FAILURE;
        }
    };

    let log_file = if matches!(cli.command, Some(Commands::Completions(_))) {
        None
    } else {
        logging::open_log_file(&paths.log_file()).ok()
    };
    logging::init_logging(cli.use_json(), cli.verbose, cli.quiet, log_file);
    debug!(root = %paths.root().display(), version = build_info::VERSION, "Starting");

    let config = cfg::load_or_default(paths.config_file());
    let out = OutputMode::from_cli(&cli, &config.theme).into_output();
    let mut app = App {
        cli: &cli,
        paths,
        config,
        out,
    };

    match run(&mut app) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!(error = %e, "Command failed");
            app.out.error(&e);
            ExitCode::FAILURE
        }
    }
}

fn run(app: &mut App<'_>) -> Result<()> {
    let cli = app.cli;
    match &cli.command {
        None => print_quick_start(app),
        Some(Commands::Init(args)) => cmd_init(app, args),
        Some(Commands::List(args)) => cmd_list(app, args),
        Some(Commands::Create(args)) => cmd_create(app, args),
        Some(Commands::Rename(args)) => cmd_rename(app, args),
        Some(Commands::Delete(args)) => cmd_delete(app, args),
        Some(Commands::Apply(args)) => cmd_apply(app, args),
        Some(Commands::Import(args)) => cmd_import(app, args),
        Some(Commands::Backups) => cmd_backups(app),
        Some(Commands::OpenBackups) => cmd_open_backups(app),
        Some(Commands::Launch(args)) => cmd_launch(app, args),
        Some(Commands::Playlist(command)) => cmd_playlist(app, command),
        Some(Commands::Config(command)) => cmd_config(app, command),
        Some(Commands::Version) => cmd_version(app),
        Some(Commands::Completions(args)) => cmd_completions(args),
    }
}

// === Quick Start ===

#[derive(Serialize)]
struct RobotQuickStart {
    tool: &'static str,
    version: &'static str,
    description: &'static str,
    saves: [&'static str; 5],
    playlists: [&'static str; 4],
    config: [&'static str; 2],
    output_modes: [&'static str; 3],
}

#[allow(clippy::unnecessary_wraps)] // Consistent return type with other commands
fn print_quick_start(app: &App<'_>) -> Result<()> {
    if app.cli.use_json() {
        let help = RobotQuickStart {
            tool: "udsm",
            version: build_info::VERSION,
            description: "UNDERTALE / DELTARUNE save manager",
            saves: [
                "udsm list --robot",
                "udsm create -g <GAME> <NAME>",
                "udsm apply <NAME>",
                "udsm rename <OLD> <NEW>",
                "udsm delete <NAME> --yes",
            ],
            playlists: [
                "udsm playlist new <NAME>",
                "udsm playlist add <PLAYLIST> <SAVE>",
                "udsm playlist show <PLAYLIST> --robot",
                "udsm playlist play <PLAYLIST>",
            ],
            config: ["udsm config show --robot", "udsm config set <KEY> <VALUE>"],
            output_modes: [
                "--format=text (default)",
                "--robot or --format=json",
                "--format=json-compact",
            ],
        };
        match serde_json::to_string_pretty(&help) {
            Ok(json) => println!("{json}"),
            Err(e) => warn!(error = %e, "Failed to serialize quick start"),
        }
        return Ok(());
    }

    let term = Term::stdout();
    let lines = [
        format!(
            "{} {} - UNDERTALE / DELTARUNE save manager\n",
            console::style("udsm").bold().cyan(),
            build_info::VERSION
        ),
        console::style("QUICK START").bold().underlined().to_string(),
        String::new(),
        format!("  {}  Set up the data folder", console::style("udsm init").green()),
        format!("  {}  List SAVEs", console::style("udsm list").green()),
        format!(
            "  {}  Snapshot the live save",
            console::style("udsm create -g ut \"Before Asgore\"").green()
        ),
        format!(
            "  {}  Swap a SAVE in (backs up the live save)",
            console::style("udsm apply \"Before Asgore\"").green()
        ),
        format!("  {}  Play a playlist", console::style("udsm playlist play <NAME>").green()),
        String::new(),
        format!("Run {} for full help", console::style("udsm --help").yellow()),
    ];
    for line in lines {
        let _ = term.write_line(&line);
    }
    Ok(())
}

// === Helpers ===

/// Use the given game, or find the one that has a SAVE named `name`.
fn resolve_game(store: &SnapshotStore, game: Option<Game>, name: &str) -> Result<Game> {
    match game {
        Some(game) if store.contains(game, name) => Ok(game),
        Some(game) => Err(UdsmError::SnapshotNotFound {
            game,
            name: name.to_string(),
        }),
        None => store.find_game(name).ok_or_else(|| UdsmError::UnknownSnapshot {
            name: name.to_string(),
        }),
    }
}

fn launch_request(config: &Config, game: Game, mode: LaunchMode) -> Result<LaunchRequest> {
    Ok(match mode {
        LaunchMode::Steam => LaunchRequest::steam(game),
        LaunchMode::File => LaunchRequest::file(game, config.require_file_path(game)?),
    })
}

/// Ask before destroying something. Non-interactive sessions must pass `--yes`.
fn confirm(app: &App<'_>, prompt: &str, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    let term = Term::stderr();
    if app.cli.use_json() || !term.is_term() || !io::stdin().is_terminal() {
        return Err(UdsmError::ConfirmationRequired);
    }
    term.write_str(&format!("{prompt} [y/N] "))?;
    let answer = term.read_line()?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

// === SAVE Commands ===

fn cmd_init(app: &mut App<'_>, args: &cli::InitArgs) -> Result<()> {
    app.paths.ensure_layout()?;
    let config_file = app.paths.config_file();
    if args.force || !config_file.exists() {
        app.config = Config::default();
        app.save_config()?;
        info!(path = %config_file.display(), "Wrote default configuration");
    }
    app.out
        .success(&format!("Data folder ready at {}", app.paths.root().display()));
    Ok(())
}

#[allow(clippy::unnecessary_wraps)] // Consistent return type with other commands
fn cmd_list(app: &App<'_>, args: &cli::ListArgs) -> Result<()> {
    let store = app.store();
    let listings: Vec<SnapshotListing> = Game::ALL
        .into_iter()
        .filter(|g| args.game.is_none_or(|only| only == *g))
        .map(|game| SnapshotListing {
            game,
            names: store.list(game),
        })
        .collect();
    app.out.snapshot_list(&listings);
    Ok(())
}

fn cmd_create(app: &App<'_>, args: &cli::CreateArgs) -> Result<()> {
    let source = match &args.from {
        Some(dir) => cfg::expand_home(dir)?,
        None => app.config.require_save_path(args.game)?,
    };
    let store = app.store();
    let status = store.create(args.game, &args.name, &source)?;
    app.out.op_result(&OpResult {
        action: "Created",
        game: args.game,
        name: args.name.trim(),
        new_name: None,
        result: &status,
    });
    Ok(())
}

fn cmd_rename(app: &App<'_>, args: &cli::RenameArgs) -> Result<()> {
    let store = app.store();
    let game = resolve_game(&store, args.game, &args.old)?;
    let status = store.rename(game, &args.old, &args.new)?;
    app.out.op_result(&OpResult {
        action: "Renamed",
        game,
        name: &args.old,
        new_name: Some(args.new.trim()),
        result: &status,
    });
    Ok(())
}

fn cmd_delete(app: &App<'_>, args: &cli::DeleteArgs) -> Result<()> {
    let store = app.store();
    let game = resolve_game(&store, args.game, &args.name)?;
    let prompt = format!("Delete {game} SAVE '{}'?", args.name);
    if !confirm(app, &prompt, args.yes)? {
        app.out.info("Nothing deleted");
        return Ok(());
    }
    let status = store.delete(game, &args.name);
    app.out.op_result(&OpResult {
        action: "Deleted",
        game,
        name: &args.name,
        new_name: None,
        result: &status,
    });
    Ok(())
}

/// Refuse a live save path that does not look like the game's own folder.
fn check_save_path(game: Game, live: &Path, force: bool) -> Result<()> {
    if force || game.is_plausible_save_path(live) {
        return Ok(());
    }
    Err(UdsmError::SuspiciousSavePath {
        game,
        path: live.display().to_string(),
        expected: game.display_name(),
    })
}

fn cmd_apply(app: &App<'_>, args: &cli::ApplyArgs) -> Result<()> {
    let store = app.store();
    let game = resolve_game(&store, args.game, &args.name)?;
    let live = app.config.require_save_path(game)?;
    check_save_path(game, &live, args.force)?;
    // Resolve the launch before touching the live save.
    let request = if args.launch {
        Some(launch_request(&app.config, game, args.mode)?)
    } else {
        None
    };

    let report = store.apply(game, &args.name, &live);
    app.out.apply_report(&report);

    if let Some(request) = request.filter(|_| report.status.is_success()) {
        let launcher = SystemLauncher::new();
        launcher.launch(&request);
        app.out.launched(&request);
    }
    Ok(())
}

fn cmd_import(app: &App<'_>, args: &cli::ImportArgs) -> Result<()> {
    let dir = cfg::expand_home(&args.dir)?;
    if !dir.is_dir() {
        return Err(UdsmError::Other(format!(
            "Import folder not found: {}",
            dir.display()
        )));
    }
    let report = app.store().import_tree(&dir, args.filter.as_deref());
    app.out.import_report(&report);
    Ok(())
}

// === Backups & Launching ===

#[allow(clippy::unnecessary_wraps)] // Consistent return type with other commands
fn cmd_backups(app: &App<'_>) -> Result<()> {
    let store = app.store();
    let archiver = store.archiver();
    app.out.backup_list(archiver.root(), &archiver.list());
    Ok(())
}

fn cmd_open_backups(app: &App<'_>) -> Result<()> {
    let root = app.paths.backups_dir();
    std::fs::create_dir_all(&root)
        .with_context(|| format!("Failed to create {}", root.display()))?;
    let launcher = SystemLauncher::new();
    launcher.open(&root);
    app.out.opened(&root);
    Ok(())
}

fn cmd_launch(app: &App<'_>, args: &cli::LaunchArgs) -> Result<()> {
    let request = launch_request(&app.config, args.game, args.mode)?;
    let launcher = SystemLauncher::new();
    launcher.launch(&request);
    app.out.launched(&request);
    Ok(())
}

// === Playlists ===

fn cmd_playlist(app: &mut App<'_>, command: &PlaylistCommand) -> Result<()> {
    match command {
        PlaylistCommand::List => {
            app.out.playlist_list(&app.config.playlists);
            Ok(())
        }
        PlaylistCommand::Show { name } => {
            let store = app.store();
            let entries: Vec<PlaylistEntryView> = app
                .config
                .playlists
                .entries(name)?
                .iter()
                .enumerate()
                .map(|(index, entry)| PlaylistEntryView {
                    index,
                    name: entry.clone(),
                    game: store.find_game(entry),
                })
                .collect();
            app.out.playlist_show(name, &entries);
            Ok(())
        }
        PlaylistCommand::New { name } => {
            let created = match name {
                Some(name) => app.config.playlists.create_named(name)?,
                None => app.config.playlists.create(),
            };
            app.save_config()?;
            app.out
                .playlist_changed(&format!("Created playlist '{created}'"), &created, &[]);
            Ok(())
        }
        PlaylistCommand::Rename { old, new } => {
            let renamed = app.config.playlists.rename(old, new)?;
            app.save_config()?;
            let entries = app.config.playlists.entries(&renamed)?.to_vec();
            app.out.playlist_changed(
                &format!("Renamed playlist '{old}' to '{renamed}'"),
                &renamed,
                &entries,
            );
            Ok(())
        }
        PlaylistCommand::Delete { name, yes } => {
            // Check it exists before asking.
            app.config.playlists.entries(name)?;
            if !confirm(app, &format!("Delete playlist '{name}'?"), *yes)? {
                app.out.info("Nothing deleted");
                return Ok(());
            }
            let entries = app.config.playlists.delete(name)?;
            app.save_config()?;
            app.out
                .playlist_changed(&format!("Deleted playlist '{name}'"), name, &entries);
            Ok(())
        }
        PlaylistCommand::Add { name, save } => {
            if app.store().find_game(save).is_none() {
                return Err(UdsmError::UnknownSnapshot { name: save.clone() });
            }
            let index = app.config.playlists.append(name, save)?;
            app.save_config()?;
            let entries = app.config.playlists.entries(name)?.to_vec();
            app.out.playlist_changed(
                &format!("Added '{save}' at index {index}"),
                name,
                &entries,
            );
            Ok(())
        }
        PlaylistCommand::Remove { name, index } => {
            let removed = app.config.playlists.remove(name, *index)?;
            app.save_config()?;
            let entries = app.config.playlists.entries(name)?.to_vec();
            app.out
                .playlist_changed(&format!("Removed '{removed}'"), name, &entries);
            Ok(())
        }
        PlaylistCommand::Up { name, index } => {
            let moved = app.config.playlists.move_up(name, *index)?;
            playlist_moved(app, name, *index, moved, "up")
        }
        PlaylistCommand::Down { name, index } => {
            let moved = app.config.playlists.move_down(name, *index)?;
            playlist_moved(app, name, *index, moved, "down")
        }
        PlaylistCommand::Play(args) => cmd_play(app, args),
    }
}

fn playlist_moved(app: &App<'_>, name: &str, index: usize, moved: bool, direction: &str) -> Result<()> {
    if moved {
        app.save_config()?;
    }
    let entries = app.config.playlists.entries(name)?.to_vec();
    let message = if moved {
        format!("Moved entry {index} {direction}")
    } else {
        format!("Entry {index} is already at the {}", if direction == "up" { "top" } else { "bottom" })
    };
    app.out.playlist_changed(&message, name, &entries);
    Ok(())
}

fn cmd_play(app: &App<'_>, args: &PlayArgs) -> Result<()> {
    let entries = app.config.playlists.entries(&args.name)?.to_vec();
    let settings = RunSettings::from_config(&app.config, args.mode)
        .with_cooldown(Duration::from_secs(args.cooldown));

    let store = app.store();
    // Every run swaps live saves, so check the paths up front like apply does.
    let games: BTreeSet<Game> = entries.iter().filter_map(|e| store.find_game(e)).collect();
    for game in games {
        if let Some(live) = app.config.save_path(game) {
            check_save_path(game, &live, args.force)?;
        }
    }

    let probe = SysinfoProbe::new();
    let launcher = SystemLauncher::new();
    let mut runner = PlaylistRunner::new(&store, &probe, &launcher, settings);
    runner.start(entries)?;
    info!(playlist = %args.name, "Playing playlist");

    let spinner = (!app.cli.use_json() && !app.cli.quiet && Term::stderr().is_term()).then(|| {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.enable_steady_tick(Duration::from_millis(120));
        pb
    });

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .with_context(|| "Failed to start runtime")?;
    let summary = runtime.block_on(drive_run(
        &mut runner,
        app.out.as_ref(),
        spinner.as_ref(),
        &args.name,
    ));

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    app.out.run_finished(&summary);
    Ok(())
}

/// Tick the runner every [`TICK_INTERVAL`] until it finishes or Ctrl-C
/// cancels it.
async fn drive_run(
    runner: &mut PlaylistRunner<'_>,
    out: &dyn Output,
    spinner: Option<&ProgressBar>,
    playlist: &str,
) -> RunSummary {
    let mut interval = tokio::time::interval(TICK_INTERVAL);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut ctrl_c_armed = true;

    let mut summary = RunSummary {
        playlist: playlist.to_string(),
        reason: FinishReason::Completed,
        advanced: 0,
        skipped: 0,
        failed: 0,
    };
    let mut last = Instant::now();

    loop {
        tokio::select! {
            signal = &mut ctrl_c, if ctrl_c_armed => {
                ctrl_c_armed = false;
                match signal {
                    Ok(()) => {
                        info!("Interrupted, cancelling run");
                        runner.cancel();
                    }
                    Err(e) => warn!(error = %e, "Cannot listen for Ctrl-C"),
                }
            }
            _ = interval.tick() => {
                let now = Instant::now();
                let event = runner.tick(now.duration_since(last));
                last = now;
                record_event(&event, &mut summary, runner.remaining_len(), out, spinner);
            }
        }

        if let RunState::Finished(reason) = runner.state() {
            summary.reason = reason;
            return summary;
        }
    }
}

fn record_event(
    event: &TickEvent,
    summary: &mut RunSummary,
    remaining: usize,
    out: &dyn Output,
    spinner: Option<&ProgressBar>,
) {
    match event {
        TickEvent::Waiting {
            game_running,
            cooldown,
        } => {
            if let Some(pb) = spinner {
                let reason = if *game_running {
                    "waiting for the game to close".to_string()
                } else {
                    format!("next in {:.1}s", cooldown.as_secs_f32())
                };
                pb.set_message(format!("{reason} ({remaining} left)"));
            }
            return;
        }
        TickEvent::Advanced { report, .. } if report.status.is_success() => summary.advanced += 1,
        TickEvent::Advanced { .. } => summary.failed += 1,
        TickEvent::Skipped { .. } => summary.skipped += 1,
        // Reported once by run_finished.
        TickEvent::Inert | TickEvent::Finished => return,
    }
    match spinner {
        Some(pb) => pb.suspend(|| out.tick_event(event)),
        None => out.tick_event(event),
    }
}

// === Configuration ===

fn cmd_config(app: &mut App<'_>, command: &ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Show => {
            app.out.config_show(&app.paths.config_file(), &app.config);
        }
        ConfigCommand::Get { key } => {
            let value = app.config.get(key)?;
            app.out.config_value(key, value);
        }
        ConfigCommand::Set { key, value } => {
            app.config.set(key, value)?;
            app.save_config()?;
            let stored = app.config.get(key)?;
            app.out.config_value(key, stored);
        }
        ConfigCommand::Path => {
            app.out.path("path", &app.paths.config_file());
        }
    }
    Ok(())
}

// === Utilities ===

#[allow(clippy::unnecessary_wraps)] // Consistent return type with other commands
fn cmd_version(app: &App<'_>) -> Result<()> {
    app.out.version_info(&VersionInfo {
        version: build_info::VERSION,
        git_sha: build_info::git_sha(),
        git_dirty: build_info::git_dirty(),
        build_timestamp: build_info::build_timestamp(),
        rustc_version: build_info::rustc_semver(),
        target: build_info::target(),
    });
    Ok(())
}

#[allow(clippy::unnecessary_wraps)] // Consistent return type with other commands
fn cmd_completions(args: &cli::CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    clap_complete::generate(args.shell, &mut Cli::command(), "udsm", &mut io::stdout());
    Ok(())
}
