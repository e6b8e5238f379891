//! Daily viewed-prayer tracking.
//!
//! The tracker remembers which prayers were shown in the reel today. The set
//! is stamped with the day it belongs to; once the calendar day changes the
//! set no longer counts and is discarded on the next write. The previous
//! day's persisted list is never purged eagerly, only overwritten.

use std::sync::Arc;

use chrono::NaiveDate;
use log::{debug, warn};

use crate::clock::{Clock, day_string};
use crate::domain::Prayer;
use crate::storage::{KeyValueStore, PersistQueue, StorageKeys, load_json_or_default};

/// Ordered, duplicate-free set of prayer ids viewed on `date`.
pub struct ViewedTracker {
    viewed: Vec<String>,
    date: NaiveDate,
    viewed_key: String,
    date_key: String,
    queue: PersistQueue,
    clock: Arc<dyn Clock>,
}

impl ViewedTracker {
    /// Create an empty tracker for today. Call `load` to adopt persisted state.
    pub fn new(keys: &StorageKeys, queue: PersistQueue, clock: Arc<dyn Clock>) -> Self {
        Self {
            viewed: Vec::new(),
            date: clock.today(),
            viewed_key: keys.viewed_prayers.clone(),
            date_key: keys.viewed_date.clone(),
            queue,
            clock,
        }
    }

    /// Adopt the persisted set if it belongs to today, otherwise start empty
    /// and stamp today's date.
    pub async fn load(&mut self, backend: &dyn KeyValueStore) {
        let today = self.clock.today();
        let today_str = day_string(today);

        let stored_date = match backend.get(&self.date_key).await {
            Ok(date) => date,
            Err(e) => {
                warn!("Failed to read {}, starting a fresh day: {}", self.date_key, e);
                None
            }
        };

        self.date = today;
        if stored_date.as_deref() == Some(today_str.as_str()) {
            let stored: Vec<String> = load_json_or_default(backend, &self.viewed_key).await;
            self.viewed.clear();
            for id in stored {
                if !self.viewed.contains(&id) {
                    self.viewed.push(id);
                }
            }
            debug!("Restored {} viewed prayers for {}", self.viewed.len(), today_str);
        } else {
            debug!(
                "Viewed prayers are from {:?}, resetting for {}",
                stored_date.unwrap_or_default(),
                today_str
            );
            self.viewed.clear();
            self.queue.set(&self.date_key, today_str);
        }
    }

    /// The day the in-memory set was built for.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// True while the set still belongs to the current calendar day.
    pub fn is_current(&self) -> bool {
        self.date == self.clock.today()
    }

    /// Prayer ids viewed today, in the order they were viewed.
    pub fn viewed_today(&self) -> &[String] {
        if self.is_current() { self.viewed.as_slice() } else { &[] }
    }

    pub fn is_viewed(&self, prayer_id: &str) -> bool {
        self.viewed_today().iter().any(|id| id == prayer_id)
    }

    /// Record that `prayer_id` was shown today. Returns false if it already was.
    pub fn mark_viewed(&mut self, prayer_id: &str) -> bool {
        self.roll_over();
        if self.viewed.iter().any(|id| id == prayer_id) {
            return false;
        }

        self.viewed.push(prayer_id.to_string());
        self.queue.set_json(&self.viewed_key, &self.viewed);
        self.queue.set(&self.date_key, day_string(self.date));
        true
    }

    /// Count of unanswered prayers not yet viewed today.
    pub fn unviewed_count(&self, prayers: &[Prayer]) -> usize {
        prayers
            .iter()
            .filter(|p| !p.is_answered && !self.is_viewed(&p.id))
            .count()
    }

    /// Clear today's set and remove it from storage. The date key stays.
    ///
    /// Returns false, touching nothing, when no prayer was viewed today.
    pub fn reset(&mut self) -> bool {
        if self.viewed_today().is_empty() {
            return false;
        }
        self.viewed.clear();
        self.queue.remove(vec![self.viewed_key.clone()]);
        true
    }

    /// Drop in-memory state without touching storage.
    pub(crate) fn forget(&mut self) {
        self.viewed.clear();
        self.date = self.clock.today();
    }

    fn roll_over(&mut self) {
        let today = self.clock.today();
        if today != self.date {
            debug!("Day changed from {} to {}, discarding viewed set", self.date, today);
            self.viewed.clear();
            self.date = today;
        }
    }
}
