//! Theme system for human-mode output.

use console::Style;

use crate::game::Game;

/// Theme used when the configured name is empty or unknown.
pub const DEFAULT_THEME: &str = "default";

/// Names accepted by [`Theme::named`].
pub const THEME_NAMES: [&str; 2] = [DEFAULT_THEME, "mono"];

/// Visual theme for human-mode output.
///
/// Centralizes colors and styles for consistent rendering.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: &'static str,

    // Status colors
    pub success: Style,
    pub error: Style,
    pub warning: Style,
    pub accent: Style,
    pub muted: Style,

    // Component styles
    pub header: Style,
    pub label: Style,
    pub value: Style,
    pub index: Style,
    pub undertale: Style,
    pub deltarune: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: DEFAULT_THEME,
            success: Style::new().green().bold(),
            error: Style::new().red().bold(),
            warning: Style::new().yellow().bold(),
            accent: Style::new().cyan().bold(),
            muted: Style::new().dim(),
            header: Style::new().cyan().bold().underlined(),
            label: Style::new().dim(),
            value: Style::new().bold(),
            index: Style::new().yellow(),
            undertale: Style::new().red(),
            deltarune: Style::new().blue(),
        }
    }
}

impl Theme {
    /// Colorless theme; emphasis only.
    pub fn mono() -> Self {
        Self {
            name: "mono",
            success: Style::new().bold(),
            error: Style::new().bold(),
            warning: Style::new().bold(),
            accent: Style::new().bold(),
            muted: Style::new().dim(),
            header: Style::new().bold().underlined(),
            label: Style::new().dim(),
            value: Style::new().bold(),
            index: Style::new(),
            undertale: Style::new(),
            deltarune: Style::new(),
        }
    }

    /// Look a theme up by its configured name, falling back to the default.
    pub fn named(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "mono" => Self::mono(),
            "" | DEFAULT_THEME => Self::default(),
            other => {
                tracing::debug!(theme = other, "Unknown theme, using default");
                Self::default()
            }
        }
    }

    pub const fn game(&self, game: Game) -> &Style {
        match game {
            Game::Undertale => &self.undertale,
            Game::Deltarune => &self.deltarune,
        }
    }
}
