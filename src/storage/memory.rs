//! In-memory key-value storage with failure injection.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::traits::KeyValueStore;
use crate::error::{PrayerbookError, Result};

/// A write applied to a MemoryStore, in application order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppliedWrite {
    Set { key: String, value: String },
    Remove { key: String },
}

#[derive(Debug, Default)]
struct Inner {
    values: HashMap<String, String>,
    log: Vec<AppliedWrite>,
    fail_reads: bool,
    fail_writes: bool,
}

/// HashMap-backed store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a key without recording it in the write log.
    pub fn with_value(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let Ok(mut inner) = self.inner.lock() {
            inner.values.insert(key.into(), value.into());
        }
        self
    }

    /// Make every subsequent `get` fail.
    pub fn fail_reads(&self, fail: bool) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.fail_reads = fail;
        }
    }

    /// Make every subsequent `set`/`remove` fail.
    pub fn fail_writes(&self, fail: bool) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.fail_writes = fail;
        }
    }

    /// Current value of a key, bypassing failure injection.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.inner.lock().ok().and_then(|inner| inner.values.get(key).cloned())
    }

    /// Every successful write so far, oldest first.
    pub fn write_log(&self) -> Vec<AppliedWrite> {
        self.inner.lock().map(|inner| inner.log.clone()).unwrap_or_default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>> {
        self.inner.lock().map_err(|e| PrayerbookError::Storage(e.to_string()))
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let inner = self.lock()?;
        if inner.fail_reads {
            return Err(PrayerbookError::Storage(format!("read failed: {}", key)));
        }
        Ok(inner.values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let mut inner = self.lock()?;
        if inner.fail_writes {
            return Err(PrayerbookError::Storage(format!("write failed: {}", key)));
        }
        inner.values.insert(key.to_string(), value.clone());
        inner.log.push(AppliedWrite::Set {
            key: key.to_string(),
            value,
        });
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut inner = self.lock()?;
        if inner.fail_writes {
            return Err(PrayerbookError::Storage(format!("remove failed: {}", key)));
        }
        inner.values.remove(key);
        inner.log.push(AppliedWrite::Remove { key: key.to_string() });
        Ok(())
    }
}
