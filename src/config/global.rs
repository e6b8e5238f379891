//! Global configuration.
//!
//! Loaded from ~/.config/prayerbook/prayerbook.yml or .prayerbook.yml

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::events::DEFAULT_CHANNEL_CAPACITY;
use crate::storage::DEFAULT_KEY_PREFIX;

/// Global configuration for Prayerbook.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Where and how records are persisted.
    pub storage: StorageConfig,

    /// Change-notification channel.
    pub events: EventsConfig,

    /// Prayer reel behavior.
    pub reel: ReelConfig,

    /// Search history.
    pub search: SearchConfig,

    /// Log output.
    pub logging: LoggingConfig,
}

impl GlobalConfig {
    /// Load configuration with fallback chain.
    ///
    /// Search order:
    /// 1. Explicit path if provided
    /// 2. .prayerbook.yml in current directory
    /// 3. ~/.config/prayerbook/prayerbook.yml
    /// 4. Defaults
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        let config = Self::search_paths().iter().find_map(|path| Self::try_load(path));
        Ok(config.unwrap_or_else(|| {
            log::info!("No config file found, using defaults");
            Self::default()
        }))
    }

    /// Fallback locations, most specific first.
    fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(".prayerbook.yml")];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("prayerbook").join("prayerbook.yml"));
        }
        paths
    }

    /// Load `path` if it exists. A file that fails to load is logged and skipped.
    fn try_load(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }
        match Self::load_from_file(path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                Some(config)
            }
            Err(e) => {
                log::warn!("Failed to load {}: {:#}", path.display(), e);
                None
            }
        }
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.events.channel_capacity == 0 {
            eyre::bail!("events.channel-capacity must be > 0");
        }
        if !(self.reel.visibility_threshold > 0.0 && self.reel.visibility_threshold <= 1.0) {
            eyre::bail!("reel.visibility-threshold must be in (0, 1]");
        }
        if self.search.max_recent == 0 {
            eyre::bail!("search.max-recent must be > 0");
        }
        Ok(())
    }
}

/// Storage settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding one file per persisted key.
    #[serde(rename = "data-dir")]
    pub data_dir: PathBuf,

    /// Prefix for every persisted key.
    #[serde(rename = "key-prefix")]
    pub key_prefix: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("prayerbook")
            .join("data");

        Self {
            data_dir,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
        }
    }
}

/// Event channel settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EventsConfig {
    /// Broadcast buffer; slow subscribers lag past this many events.
    #[serde(rename = "channel-capacity")]
    pub channel_capacity: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

/// Prayer reel settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReelConfig {
    /// Fraction of the viewport an item must cover to count as the current one.
    #[serde(rename = "visibility-threshold")]
    pub visibility_threshold: f32,
}

impl Default for ReelConfig {
    fn default() -> Self {
        Self {
            visibility_threshold: crate::reel::DEFAULT_VISIBILITY_THRESHOLD,
        }
    }
}

/// Search settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Number of recent searches kept.
    #[serde(rename = "max-recent")]
    pub max_recent: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_recent: crate::search::DEFAULT_MAX_RECENT,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level used when RUST_LOG is not set.
    pub level: String,

    /// Log file; defaults to the local data dir.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}
