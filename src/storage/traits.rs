//! Key-value backend trait.

use async_trait::async_trait;

use crate::error::Result;

/// Flat string key-value storage, the durable side of the store.
///
/// Values are opaque strings; callers decide the encoding (JSON arrays for
/// collections, a raw string for the viewed date).
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a key. A missing key is `Ok(None)`.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a key, replacing any previous value.
    async fn set(&self, key: &str, value: String) -> Result<()>;

    /// Delete a key. Deleting a missing key succeeds.
    async fn remove(&self, key: &str) -> Result<()>;

    /// Delete several keys.
    async fn multi_remove(&self, keys: &[String]) -> Result<()> {
        for key in keys {
            self.remove(key).await?;
        }
        Ok(())
    }
}
