//! Persisted recent-search history.

use log::debug;

use crate::storage::{KeyValueStore, PersistQueue, load_json_or_default};
use crate::store::RecordStore;

/// Most-recent-first list of past queries, duplicate-free and capped.
#[derive(Debug, Clone)]
pub struct RecentSearches {
    entries: Vec<String>,
    key: String,
    max: usize,
    queue: PersistQueue,
}

impl RecentSearches {
    pub fn new(key: impl Into<String>, queue: PersistQueue, max: usize) -> Self {
        Self {
            entries: Vec::new(),
            key: key.into(),
            max: max.max(1),
            queue,
        }
    }

    /// History sharing the store's key prefix and write queue.
    pub fn for_store(store: &RecordStore, max: usize) -> Self {
        Self::new(store.keys().recent_searches.clone(), store.persist_queue(), max)
    }

    /// Replace the in-memory list with the persisted one.
    pub async fn load(&mut self, backend: &dyn KeyValueStore) {
        let stored: Vec<String> = load_json_or_default(backend, &self.key).await;
        self.entries.clear();
        for query in stored {
            let query = query.trim();
            if !query.is_empty() && !self.entries.iter().any(|e| e == query) {
                self.entries.push(query.to_string());
            }
        }
        self.entries.truncate(self.max);
        debug!("Loaded {} recent searches", self.entries.len());
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Move `query` to the front. Blank queries are ignored.
    pub fn record(&mut self, query: &str) -> bool {
        let query = query.trim();
        if query.is_empty() {
            return false;
        }

        self.entries.retain(|e| e != query);
        self.entries.insert(0, query.to_string());
        self.entries.truncate(self.max);
        self.persist();
        true
    }

    pub fn remove(&mut self, query: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e != query);
        if self.entries.len() == before {
            return false;
        }
        self.persist();
        true
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.queue.remove(vec![self.key.clone()]);
    }

    fn persist(&self) {
        self.queue.set_json(&self.key, &self.entries);
    }
}
