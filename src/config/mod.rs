//! Configuration system for Prayerbook.
//!
//! A single YAML file, searched in the project directory and then the user
//! config directory. Every section has defaults, so an empty or missing file
//! is a valid configuration.

use eyre::Result;
use std::path::PathBuf;

pub use self::global::{EventsConfig, GlobalConfig, LoggingConfig, ReelConfig, SearchConfig, StorageConfig};

mod global;

/// Load configuration from the standard search paths.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. .prayerbook.yml in current directory (project config)
/// 3. ~/.config/prayerbook/prayerbook.yml (user config)
/// 4. Default values
pub fn load_config(explicit_path: Option<&PathBuf>) -> Result<GlobalConfig> {
    GlobalConfig::load(explicit_path)
}
