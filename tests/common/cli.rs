//! Runs the `udsm` binary against a private data folder.
//!
//! [`CliResult`] carries the captured output plus chainable assertions for
//! exit codes, text and robot-mode JSON.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use serde_json::Value;
use tempfile::TempDir;

/// Environment every run starts from. `RUST_LOG=off` keeps log lines out of
/// stderr so it only carries command output; `latest.log` still records.
const BASE_ENV: [(&str, &str); 2] = [("RUST_LOG", "off"), ("NO_COLOR", "1")];

/// Test runner for the `udsm` binary.
///
/// Every runner owns a temporary data folder passed as `--home`, so tests
/// never see the user's real SAVEs or configuration.
///
/// ```ignore
/// let cli = CliRunner::new();
/// cli.run(&["init"]).assert_success();
/// cli.run_robot(&["list"]).assert_json_array_len("", 2);
/// ```
pub struct CliRunner {
    binary: PathBuf,
    home: TempDir,
    env: Vec<(String, String)>,
}

impl Default for CliRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CliRunner {
    #[must_use]
    pub fn new() -> Self {
        Self {
            binary: PathBuf::from(env!("CARGO_BIN_EXE_udsm")),
            home: TempDir::new().expect("Failed to create temp directory"),
            env: BASE_ENV
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        }
    }

    /// Set an environment variable for every later run.
    #[must_use]
    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.env.retain(|(k, _)| k != key);
        self.env.push((key.to_string(), value.to_string()));
        self
    }

    /// The data folder passed as `--home`.
    #[must_use]
    pub fn home(&self) -> &Path {
        self.home.path()
    }

    /// A folder for live saves and import sources. It sits inside the
    /// temporary folder but outside every directory the store manages.
    #[must_use]
    pub fn outside(&self, name: &str) -> PathBuf {
        self.home.path().join("outside").join(name)
    }

    /// `latest.log` as left by the most recent run.
    #[must_use]
    pub fn log_contents(&self) -> String {
        fs::read_to_string(self.home.path().join("latest.log")).unwrap_or_default()
    }

    #[must_use]
    pub fn run(&self, args: &[&str]) -> CliResult {
        let start = Instant::now();
        let output = Command::new(&self.binary)
            .arg("--home")
            .arg(self.home.path())
            .args(args)
            .env_remove("UDSM_HOME")
            .env_remove("UDSM_FORMAT")
            .envs(self.env.iter().map(|(k, v)| (k, v)))
            .stdin(Stdio::null())
            .output()
            .expect("Failed to execute udsm");

        CliResult {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code().unwrap_or(-1),
            duration: start.elapsed(),
            args: args.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// Run with `--robot` in front of `args`.
    #[must_use]
    pub fn run_robot(&self, args: &[&str]) -> CliResult {
        let mut full = vec!["--robot"];
        full.extend_from_slice(args);
        self.run(&full)
    }

    /// Point a `*_save_path` key at `path` through `config set`.
    pub fn set_save_path(&self, key: &str, path: &Path) {
        let path = path.to_string_lossy();
        let _ = self.run(&["config", "set", key, &path]).assert_success();
    }
}

/// Captured output of one run.
#[derive(Debug, Clone)]
pub struct CliResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub duration: Duration,
    pub args: Vec<String>,
}

impl CliResult {
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    #[must_use]
    pub fn assert_success(&self) -> &Self {
        assert!(
            self.success(),
            "udsm {:?} exited with {}\nstderr:\n{}",
            self.args,
            self.exit_code,
            self.stderr
        );
        self
    }

    #[must_use]
    pub fn assert_failure(&self) -> &Self {
        assert!(
            !self.success(),
            "udsm {:?} succeeded unexpectedly\nstdout:\n{}",
            self.args,
            self.stdout
        );
        self
    }

    #[must_use]
    pub fn assert_stdout_contains(&self, text: &str) -> &Self {
        assert!(
            self.stdout.contains(text),
            "stdout lacks {text:?}\nstdout:\n{}",
            self.stdout
        );
        self
    }

    #[must_use]
    pub fn assert_stdout_not_contains(&self, text: &str) -> &Self {
        assert!(
            !self.stdout.contains(text),
            "stdout unexpectedly has {text:?}\nstdout:\n{}",
            self.stdout
        );
        self
    }

    #[must_use]
    pub fn assert_stdout_matches(&self, pattern: &str) -> &Self {
        let re = regex::Regex::new(pattern).expect("Invalid regex pattern");
        assert!(
            re.is_match(&self.stdout),
            "stdout does not match {pattern:?}\nstdout:\n{}",
            self.stdout
        );
        self
    }

    #[must_use]
    pub fn assert_stderr_contains(&self, text: &str) -> &Self {
        assert!(
            self.stderr.contains(text),
            "stderr lacks {text:?}\nstderr:\n{}",
            self.stderr
        );
        self
    }

    /// Stdout as one JSON document.
    #[must_use]
    pub fn json(&self) -> Value {
        parse(&self.stdout, "stdout")
    }

    /// Stderr as one JSON document (robot-mode errors).
    #[must_use]
    pub fn stderr_json(&self) -> Value {
        parse(&self.stderr, "stderr")
    }

    /// Stdout as JSON lines (streamed run events).
    #[must_use]
    pub fn json_lines(&self) -> Vec<Value> {
        self.stdout
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| parse(l, "stdout line"))
            .collect()
    }

    /// Compare the value at a JSON pointer (`""` is the whole document).
    #[must_use]
    pub fn assert_json_field(&self, pointer: &str, expected: &Value) -> &Self {
        let json = self.json();
        let actual = json
            .pointer(pointer)
            .unwrap_or_else(|| panic!("{pointer} not found in:\n{json:#}"));
        assert_eq!(actual, expected, "JSON value at {pointer}");
        self
    }

    #[must_use]
    pub fn assert_json_array_len(&self, pointer: &str, len: usize) -> &Self {
        let json = self.json();
        let actual = json
            .pointer(pointer)
            .and_then(Value::as_array)
            .unwrap_or_else(|| panic!("no array at {pointer} in:\n{json:#}"))
            .len();
        assert_eq!(actual, len, "array length at {pointer}");
        self
    }

    #[must_use]
    pub fn assert_duration_under(&self, max: Duration) -> &Self {
        assert!(self.duration < max, "udsm took {:?}, limit {max:?}", self.duration);
        self
    }
}

fn parse(text: &str, what: &str) -> Value {
    serde_json::from_str(text.trim()).unwrap_or_else(|e| panic!("{what} is not JSON ({e}):\n{text}"))
}
