//! Error types for Prayerbook
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in Prayerbook
#[derive(Debug, Error)]
pub enum PrayerbookError {
    /// Key-value backend error
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for Prayerbook operations
pub type Result<T> = std::result::Result<T, PrayerbookError>;
