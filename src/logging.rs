//! Structured logging initialization for the save manager.
//!
//! Supports both human-friendly and machine-readable (JSON) output formats,
//! with proper TTY detection and verbosity control. A plain-text copy of
//! the log can be kept in `latest.log`, truncated on every start.

use std::fs::{self, File};
use std::io::{self, IsTerminal};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Filter for the log file; it always records debug detail.
pub const FILE_DIRECTIVE: &str = "udsm=debug";

/// Build the stderr filter directive for the given verbosity.
pub fn default_directive(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        "udsm=error"
    } else {
        match verbose {
            0 => "udsm=info",
            1 => "udsm=debug",
            _ => "udsm=trace",
        }
    }
}

/// Create (or truncate) the log file, creating its directory if needed.
pub fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    File::create(path)
}

/// Initialize the tracing subscriber based on CLI flags and environment.
///
/// # Arguments
///
/// * `robot_mode` - If true, output structured JSON logs for machine consumption
/// * `verbose` - Verbosity level: 0 = info, 1 = debug, 2+ = trace
/// * `quiet` - If true, suppress non-essential output (only errors)
/// * `log_file` - Optional file receiving a plain-text copy at debug level
///
/// # Environment Variables
///
/// * `RUST_LOG` - Override the stderr filter (e.g., "udsm=debug,udsm::store=trace")
///
/// # Output Behavior
///
/// | Mode | TTY | Output |
/// |------|-----|--------|
/// | Robot | any | JSON lines to stderr |
/// | Human | yes | Pretty colored output to stderr |
/// | Human | no | Compact plain output to stderr |
pub fn init_logging(robot_mode: bool, verbose: u8, quiet: bool, log_file: Option<File>) {
    // Allow RUST_LOG to override, but use our default otherwise
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    let stderr_layer: Box<dyn Layer<Registry> + Send + Sync> = if robot_mode {
        // JSON output for scripts
        fmt::layer()
            .json()
            .with_target(true)
            .with_file(false)
            .with_line_number(false)
            .with_thread_ids(false)
            .with_span_events(FmtSpan::NONE)
            .with_writer(io::stderr)
            .with_filter(filter)
            .boxed()
    } else if io::stderr().is_terminal() {
        // Pretty output for interactive terminals
        fmt::layer()
            .with_target(false)
            .with_file(false)
            .with_line_number(false)
            .with_thread_ids(false)
            .with_span_events(FmtSpan::NONE)
            .with_writer(io::stderr)
            .with_filter(filter)
            .boxed()
    } else {
        // Compact output for non-TTY (piped, redirected)
        fmt::layer()
            .with_ansi(false)
            .with_target(false)
            .with_file(false)
            .with_line_number(false)
            .with_thread_ids(false)
            .with_span_events(FmtSpan::NONE)
            .compact()
            .with_writer(io::stderr)
            .with_filter(filter)
            .boxed()
    };

    let file_layer = log_file.map(|file| {
        fmt::layer()
            .with_ansi(false)
            .with_target(true)
            .with_thread_names(true)
            .with_span_events(FmtSpan::NONE)
            .with_writer(Mutex::new(file))
            .with_filter(EnvFilter::new(FILE_DIRECTIVE))
    });

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();
}
