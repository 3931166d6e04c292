//! Configuration and on-disk layout.
//!
//! The configuration is an explicit [`Config`] value: loaded once when a
//! command starts, handed to whatever needs it, and saved back when the
//! command changed it.

mod loader;
mod path;
mod schema;

pub use loader::{ConfigFormat, load_config, load_config_from_str, load_or_default, save_config};
pub use path::{
    APP_DIR_NAME, AppPaths, BACKUPS_DIR_NAME, CONFIG_FILE_NAME, HOME_ENV, LOG_FILE_NAME,
    expand_home, home_dir,
};
pub use schema::{Config, SCALAR_KEYS};
