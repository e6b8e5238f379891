//! Storage layer for Prayerbook - durable key-value mirror of the in-memory store.
//!
//! The store keeps its collections in memory and mirrors each changed
//! collection, in full, to a flat key-value backend:
//! - **FileStore**: one file per key under a data directory
//! - **MemoryStore**: a HashMap, with failure injection for tests
//!
//! Writes go through `PersistQueue`, a single worker applying them in order.

mod file;
mod keys;
mod memory;
mod traits;
mod writer;

pub use file::FileStore;
pub use keys::{DEFAULT_KEY_PREFIX, StorageKeys};
pub use memory::{AppliedWrite, MemoryStore};
pub use traits::KeyValueStore;
pub use writer::PersistQueue;

use log::warn;
use serde::de::DeserializeOwned;

/// Read and decode a JSON value, treating any failure as absent.
///
/// Used at startup: an unreadable or corrupt key must not stop the app.
pub async fn load_json_or_default<T: DeserializeOwned + Default>(backend: &dyn KeyValueStore, key: &str) -> T {
    match backend.get(key).await {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to parse {}, treating as empty: {}", key, e);
                T::default()
            }
        },
        Ok(None) => T::default(),
        Err(e) => {
            warn!("Failed to read {}, treating as empty: {}", key, e);
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_json_missing_key() {
        let backend = MemoryStore::new();
        let value: Vec<String> = load_json_or_default(&backend, "missing").await;
        assert!(value.is_empty());
    }

    #[tokio::test]
    async fn test_load_json_present() {
        let backend = MemoryStore::new().with_value("ids", r#"["a","b"]"#);
        let value: Vec<String> = load_json_or_default(&backend, "ids").await;
        assert_eq!(value, vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn test_load_json_corrupt_is_default() {
        let backend = MemoryStore::new().with_value("ids", "{not json");
        let value: Vec<String> = load_json_or_default(&backend, "ids").await;
        assert!(value.is_empty());
    }

    #[tokio::test]
    async fn test_load_json_read_failure_is_default() {
        let backend = MemoryStore::new().with_value("ids", r#"["a"]"#);
        backend.fail_reads(true);
        let value: Vec<String> = load_json_or_default(&backend, "ids").await;
        assert!(value.is_empty());
    }
}
