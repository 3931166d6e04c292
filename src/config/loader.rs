//! Loading and saving the configuration file.
//!
//! The format is picked from the file extension. A missing file yields the
//! defaults; a file that fails to parse is logged and replaced by the
//! defaults in memory, so a broken config never blocks the tool.

use std::path::Path;

use tracing::{debug, error, info, instrument, trace};

use super::schema::Config;
use crate::error::{Result, UdsmError};

/// Configuration file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML format (.toml).
    Toml,
    /// YAML format (.yaml, .yml).
    Yaml,
    /// JSON format (.json), as written by older releases.
    Json,
}

impl ConfigFormat {
    /// Detect format from file extension.
    ///
    /// Returns `None` if the extension is not recognized.
    #[must_use]
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        trace!(extension = %ext, "Detecting config format from extension");
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Get the canonical file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Toml => "toml",
            Self::Yaml => "yaml",
            Self::Json => "json",
        }
    }
}

fn detect_format(path: &Path) -> Result<ConfigFormat> {
    ConfigFormat::from_extension(path).ok_or_else(|| {
        UdsmError::ConfigParse(format!(
            "Unknown config format for '{}': expected .toml, .yaml, .yml, or .json",
            path.display()
        ))
    })
}

/// Load the configuration from a file.
///
/// # Errors
///
/// Returns an error if the file is missing, unreadable, has an unknown
/// extension, or cannot be parsed.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let format = detect_format(path)?;
    debug!(format = ?format, "Detected config format");

    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            UdsmError::ConfigNotFound {
                path: path.display().to_string(),
            }
        } else {
            UdsmError::Io(e)
        }
    })?;
    debug!(bytes = content.len(), "Read config file");

    load_config_from_str(&content, format)
}

/// Parse a configuration from a string with a specified format.
///
/// Missing keys take their default value; unknown keys are ignored.
#[instrument(skip(content), fields(format = ?format, content_len = content.len()))]
pub fn load_config_from_str(content: &str, format: ConfigFormat) -> Result<Config> {
    if content.trim().is_empty() {
        debug!("Empty config content, using defaults");
        return Ok(Config::default());
    }

    let config: Config = match format {
        ConfigFormat::Toml => {
            toml::from_str(content).map_err(|e| UdsmError::ConfigParse(format!("TOML: {e}")))?
        }
        ConfigFormat::Yaml => serde_yaml::from_str(content)
            .map_err(|e| UdsmError::ConfigParse(format!("YAML: {e}")))?,
        ConfigFormat::Json => serde_json::from_str(content)
            .map_err(|e| UdsmError::ConfigParse(format!("JSON: {e}")))?,
    };

    info!(
        playlists = config.playlists.len(),
        theme = %config.theme,
        "Configuration loaded"
    );
    Ok(config)
}

/// Load the configuration, falling back to defaults when the file is
/// missing or broken.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_or_default<P: AsRef<Path>>(path: P) -> Config {
    match load_config(path) {
        Ok(config) => config,
        Err(UdsmError::ConfigNotFound { .. }) => {
            debug!("No config file yet, using defaults");
            Config::default()
        }
        Err(e) => {
            error!(error = %e, "Failed to load configuration, using defaults");
            Config::default()
        }
    }
}

/// Save the configuration, creating the parent directory if needed.
#[instrument(skip(config), fields(path = %path.as_ref().display()))]
pub fn save_config<P: AsRef<Path>>(config: &Config, path: P) -> Result<()> {
    let path = path.as_ref();
    let format = detect_format(path)?;

    let content = match format {
        ConfigFormat::Toml => toml::to_string_pretty(config)
            .map_err(|e| UdsmError::ConfigParse(format!("TOML: {e}")))?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)
            .map_err(|e| UdsmError::ConfigParse(format!("YAML: {e}")))?,
        ConfigFormat::Json => serde_json::to_string_pretty(config)
            .map_err(|e| UdsmError::ConfigParse(format!("JSON: {e}")))?,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;

    info!(
        bytes = path.metadata().map(|m| m.len()).unwrap_or(0),
        "Configuration saved"
    );
    Ok(())
}
