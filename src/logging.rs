//! Log setup for applications embedding the store.
//!
//! The library itself only emits through the `log` facade. Hosts call
//! `setup_logging` once at startup to send records to a file.

use eyre::{Context, Result};
use log::{debug, info};
use std::fs;
use std::path::PathBuf;

use crate::config::LoggingConfig;

/// Default log file: `<data_local_dir>/prayerbook/logs/prayerbook.log`.
pub fn default_log_file() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("prayerbook")
        .join("logs")
        .join("prayerbook.log")
}

/// Initialize env_logger writing to the configured file.
///
/// `RUST_LOG` wins over `config.level` when set. Later calls keep the first logger.
pub fn setup_logging(config: &LoggingConfig) -> Result<PathBuf> {
    let log_file = config.file.clone().unwrap_or_else(default_log_file);

    if let Some(log_dir) = log_file.parent() {
        fs::create_dir_all(log_dir).context("Failed to create log directory")?;
    }

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    let env = env_logger::Env::default().default_filter_or(config.level.as_str());
    if env_logger::Builder::from_env(env)
        .target(env_logger::Target::Pipe(target))
        .try_init()
        .is_err()
    {
        debug!("Logger already initialized, keeping it");
        return Ok(log_file);
    }

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(log_file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_log_file() {
        let path = default_log_file();
        assert!(path.ends_with("prayerbook/logs/prayerbook.log"));
    }

    #[test]
    fn test_setup_logging_creates_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("nested").join("app.log");
        let config = LoggingConfig {
            level: "debug".to_string(),
            file: Some(file.clone()),
        };

        assert_eq!(setup_logging(&config).unwrap(), file);
        assert!(file.exists());
        // Second call keeps the installed logger
        assert!(setup_logging(&config).is_ok());
    }
}
