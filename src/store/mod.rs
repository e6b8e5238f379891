//! Record store for Prayerbook.
//!
//! `RecordStore` owns the contact and prayer collections and the daily
//! viewed-prayer tracker. It is constructed explicitly at startup and handed
//! to the UI layer, which reads through borrowed slices and mutates only
//! through the operations below.
//!
//! Every mutation updates memory first, then enqueues a full rewrite of the
//! affected collection. Memory is the source of truth for the session; the
//! backend is a best-effort mirror. No operation returns an error: unknown
//! ids are silent no-ops and write failures are published on the event bus.
//!
//! # Example
//!
//! ```ignore
//! use prayerbook::domain::{NewContact, NewPrayer, Relationship};
//! use prayerbook::store::{RecordStore, StoreOptions};
//! use prayerbook::storage::FileStore;
//! use std::sync::Arc;
//!
//! let backend = Arc::new(FileStore::new("/path/to/data")?);
//! let mut store = RecordStore::open(backend, StoreOptions::default()).await?;
//!
//! let alice = store.add_contact(NewContact::new("Alice").with_relationship(Relationship::Friend));
//! store.add_prayer(NewPrayer::new("Health", vec![alice.id.clone()]));
//! store.delete_contact(&alice.id); // cascades: the prayer goes too
//! ```

mod contacts;
mod prayers;

use std::sync::Arc;

use log::{debug, info};
use tokio::sync::broadcast;

use crate::clock::{Clock, SystemClock};
use crate::config::GlobalConfig;
use crate::domain::{Contact, Prayer};
use crate::error::Result;
use crate::events::{DEFAULT_CHANNEL_CAPACITY, EventBus, StoreEvent};
use crate::storage::{FileStore, KeyValueStore, PersistQueue, StorageKeys, load_json_or_default};
use crate::tracker::ViewedTracker;

/// Construction options for a RecordStore.
#[derive(Clone)]
pub struct StoreOptions {
    pub keys: StorageKeys,
    pub clock: Arc<dyn Clock>,
    pub channel_capacity: usize,
}

impl StoreOptions {
    pub fn from_config(config: &GlobalConfig) -> Self {
        Self {
            keys: StorageKeys::with_prefix(&config.storage.key_prefix),
            clock: Arc::new(SystemClock),
            channel_capacity: config.events.channel_capacity,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            keys: StorageKeys::default(),
            clock: Arc::new(SystemClock),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

/// Counts shown on the home and profile screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PrayerStats {
    pub contacts: usize,
    pub prayers: usize,
    pub answered: usize,
    pub active: usize,
    pub unviewed_today: usize,
}

/// Authoritative in-memory contacts and prayers, mirrored to a key-value backend.
pub struct RecordStore {
    contacts: Vec<Contact>,
    prayers: Vec<Prayer>,
    tracker: ViewedTracker,
    loading: bool,
    backend: Arc<dyn KeyValueStore>,
    keys: StorageKeys,
    queue: PersistQueue,
    events: EventBus,
    clock: Arc<dyn Clock>,
}

impl RecordStore {
    /// Create an empty store in the loading state.
    ///
    /// Spawns the persistence worker, so a Tokio runtime must be running.
    pub fn new(backend: Arc<dyn KeyValueStore>, options: StoreOptions) -> Result<Self> {
        let events = EventBus::new(options.channel_capacity);
        let queue = PersistQueue::spawn(backend.clone(), events.clone())?;
        let tracker = ViewedTracker::new(&options.keys, queue.clone(), options.clock.clone());

        Ok(Self {
            contacts: Vec::new(),
            prayers: Vec::new(),
            tracker,
            loading: true,
            backend,
            keys: options.keys,
            queue,
            events,
            clock: options.clock,
        })
    }

    /// Create a store and load its persisted state.
    pub async fn open(backend: Arc<dyn KeyValueStore>, options: StoreOptions) -> Result<Self> {
        let mut store = Self::new(backend, options)?;
        store.load().await;
        Ok(store)
    }

    /// Open a file-backed store in the configured data directory.
    pub async fn from_config(config: &GlobalConfig) -> Result<Self> {
        let backend = Arc::new(FileStore::new(&config.storage.data_dir)?);
        Self::open(backend, StoreOptions::from_config(config)).await
    }

    /// Replace in-memory state with what the backend holds.
    ///
    /// Pending writes are applied first, so a reload never loses mutations
    /// made earlier in the session. A key that cannot be read or parsed
    /// loads as empty. `loading` is cleared once contacts, prayers and the
    /// viewed set have all been tried.
    pub async fn load(&mut self) {
        self.queue.flush().await;
        self.loading = true;

        self.contacts = load_json_or_default(self.backend.as_ref(), &self.keys.contacts).await;
        self.prayers = load_json_or_default(self.backend.as_ref(), &self.keys.prayers).await;
        self.tracker.load(self.backend.as_ref()).await;

        self.loading = false;
        info!(
            "Loaded {} contacts, {} prayers, {} viewed today",
            self.contacts.len(),
            self.prayers.len(),
            self.tracker.viewed_today().len()
        );

        self.events.emit(StoreEvent::ContactsChanged);
        self.events.emit(StoreEvent::PrayersChanged);
        self.events.emit(StoreEvent::ViewedChanged);
    }

    /// True until the initial load has completed.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn prayers(&self) -> &[Prayer] {
        &self.prayers
    }

    pub fn contact(&self, id: &str) -> Option<&Contact> {
        self.contacts.iter().find(|c| c.id == id)
    }

    pub fn prayer(&self, id: &str) -> Option<&Prayer> {
        self.prayers.iter().find(|p| p.id == id)
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    /// The backend this store mirrors to.
    pub fn backend(&self) -> Arc<dyn KeyValueStore> {
        self.backend.clone()
    }

    /// Handle to the persistence worker, for components sharing write ordering.
    pub fn persist_queue(&self) -> PersistQueue {
        self.queue.clone()
    }

    /// Get a receiver for change and persistence-failure events
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// Wait until every write issued so far has reached the backend.
    pub async fn flush(&self) {
        self.queue.flush().await;
    }

    //=== Viewed-today tracking ===

    /// Record that a prayer was shown in the reel today. Idempotent.
    pub fn mark_prayer_as_viewed(&mut self, prayer_id: &str) {
        if self.tracker.mark_viewed(prayer_id) {
            self.events.emit(StoreEvent::ViewedChanged);
        }
    }

    /// Unanswered prayers not yet viewed today.
    pub fn unviewed_prayers_count(&self) -> usize {
        self.tracker.unviewed_count(&self.prayers)
    }

    pub fn viewed_prayers_today(&self) -> &[String] {
        self.tracker.viewed_today()
    }

    pub fn is_viewed_today(&self, prayer_id: &str) -> bool {
        self.tracker.is_viewed(prayer_id)
    }

    /// Forget today's viewed set. The stored date is kept.
    pub fn reset_viewed_prayers(&mut self) {
        if self.tracker.reset() {
            self.events.emit(StoreEvent::ViewedChanged);
        }
    }

    //=== Bulk operations ===

    /// Empty both collections and the viewed set, and remove their keys.
    ///
    /// With nothing in memory to clear this is a no-op.
    pub fn clear_all_data(&mut self) {
        let had_contacts = !self.contacts.is_empty();
        let had_prayers = !self.prayers.is_empty();
        let had_viewed = !self.tracker.viewed_today().is_empty();
        if !(had_contacts || had_prayers || had_viewed) {
            debug!("clear_all_data: nothing to clear");
            return;
        }

        self.contacts.clear();
        self.prayers.clear();
        self.tracker.forget();
        self.queue.remove(self.keys.data_keys());
        info!("All data cleared");

        if had_contacts {
            self.events.emit(StoreEvent::ContactsChanged);
        }
        if had_prayers {
            self.events.emit(StoreEvent::PrayersChanged);
        }
        if had_viewed {
            self.events.emit(StoreEvent::ViewedChanged);
        }
    }

    /// Remove every prayer along with today's viewed set.
    ///
    /// With no prayers and nothing viewed today this is a no-op.
    pub fn clear_prayers(&mut self) {
        let had_prayers = !self.prayers.is_empty();
        let had_viewed = !self.tracker.viewed_today().is_empty();
        if !(had_prayers || had_viewed) {
            debug!("clear_prayers: nothing to clear");
            return;
        }

        self.prayers.clear();
        self.tracker.forget();
        self.persist_prayers();
        self.queue
            .remove(vec![self.keys.viewed_prayers.clone(), self.keys.viewed_date.clone()]);
        info!("All prayers cleared");

        if had_prayers {
            self.events.emit(StoreEvent::PrayersChanged);
        }
        if had_viewed {
            self.events.emit(StoreEvent::ViewedChanged);
        }
    }

    /// Summary counts over the current collections.
    pub fn stats(&self) -> PrayerStats {
        let answered = self.prayers.iter().filter(|p| p.is_answered).count();
        PrayerStats {
            contacts: self.contacts.len(),
            prayers: self.prayers.len(),
            answered,
            active: self.prayers.len() - answered,
            unviewed_today: self.unviewed_prayers_count(),
        }
    }

    fn persist_contacts(&self) {
        self.queue.set_json(&self.keys.contacts, &self.contacts);
    }

    fn persist_prayers(&self) {
        self.queue.set_json(&self.keys.prayers, &self.prayers);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::domain::{NewContact, NewPrayer};
    use crate::storage::MemoryStore;
    use chrono::{TimeZone, Utc};

    pub(super) fn clock() -> Arc<FixedClock> {
        Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap()))
    }

    pub(super) async fn open_store(backend: Arc<MemoryStore>, clock: Arc<FixedClock>) -> RecordStore {
        RecordStore::open(backend, StoreOptions::default().with_clock(clock))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_new_is_loading_until_loaded() {
        let backend = Arc::new(MemoryStore::new());
        let mut store = RecordStore::new(backend, StoreOptions::default().with_clock(clock())).unwrap();
        assert!(store.is_loading());
        store.load().await;
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_load_failure_is_empty_and_not_loading() {
        let backend = Arc::new(MemoryStore::new().with_value("@prayer_app_contacts", "[]"));
        backend.fail_reads(true);
        let store = open_store(backend, clock()).await;

        assert!(!store.is_loading());
        assert!(store.contacts().is_empty());
        assert!(store.prayers().is_empty());
        assert!(store.viewed_prayers_today().is_empty());
    }

    #[tokio::test]
    async fn test_load_corrupt_prayers_keeps_contacts() {
        let backend = Arc::new(
            MemoryStore::new()
                .with_value(
                    "@prayer_app_contacts",
                    r#"[{"id":"c1","name":"Alice","createdAt":"2026-10-01T00:00:00.000Z","updatedAt":"2026-10-01T00:00:00.000Z"}]"#,
                )
                .with_value("@prayer_app_prayers", "not json"),
        );
        let store = open_store(backend, clock()).await;

        assert_eq!(store.contacts().len(), 1);
        assert!(store.prayers().is_empty());
    }

    #[tokio::test]
    async fn test_clear_all_data_removes_data_keys_only() {
        let backend = Arc::new(MemoryStore::new().with_value("@prayer_app_recent_searches", r#"["job"]"#));
        let mut store = open_store(backend.clone(), clock()).await;
        let alice = store.add_contact(NewContact::new("Alice"));
        let prayer = store.add_prayer(NewPrayer::new("Health", vec![alice.id.clone()]));
        store.mark_prayer_as_viewed(&prayer.id);

        store.clear_all_data();
        store.flush().await;

        assert!(store.contacts().is_empty());
        assert!(store.prayers().is_empty());
        assert!(store.viewed_prayers_today().is_empty());
        for key in store.keys().data_keys() {
            assert_eq!(backend.peek(&key), None, "{} should be removed", key);
        }
        assert!(backend.peek("@prayer_app_recent_searches").is_some());
    }

    #[tokio::test]
    async fn test_clear_prayers_keeps_contacts() {
        let backend = Arc::new(MemoryStore::new());
        let mut store = open_store(backend.clone(), clock()).await;
        let alice = store.add_contact(NewContact::new("Alice"));
        let prayer = store.add_prayer(NewPrayer::new("Health", vec![alice.id.clone()]));
        store.mark_prayer_as_viewed(&prayer.id);

        store.clear_prayers();
        store.flush().await;

        assert_eq!(store.contacts().len(), 1);
        assert!(store.prayers().is_empty());
        assert_eq!(backend.peek("@prayer_app_prayers").as_deref(), Some("[]"));
        assert_eq!(backend.peek("@prayer_app_viewed_prayers"), None);
        assert_eq!(backend.peek("@prayer_app_viewed_date"), None);
    }

    #[tokio::test]
    async fn test_stats() {
        let backend = Arc::new(MemoryStore::new());
        let mut store = open_store(backend, clock()).await;
        let alice = store.add_contact(NewContact::new("Alice"));
        let p1 = store.add_prayer(NewPrayer::new("Health", vec![alice.id.clone()]));
        store.add_prayer(NewPrayer::new("Job", vec![alice.id.clone()]));
        let p3 = store.add_prayer(NewPrayer::new("Exam", vec![alice.id.clone()]));
        store.set_prayer_answered(&p3.id, true);
        store.mark_prayer_as_viewed(&p1.id);

        assert_eq!(
            store.stats(),
            PrayerStats {
                contacts: 1,
                prayers: 3,
                answered: 1,
                active: 2,
                unviewed_today: 1,
            }
        );
    }

    #[tokio::test]
    async fn test_mark_viewed_emits_once() {
        let backend = Arc::new(MemoryStore::new());
        let mut store = open_store(backend, clock()).await;
        let mut rx = store.subscribe();

        store.mark_prayer_as_viewed("p1");
        store.mark_prayer_as_viewed("p1");

        assert_eq!(rx.try_recv().unwrap(), StoreEvent::ViewedChanged);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_load_keeps_unflushed_mutations() {
        let backend = Arc::new(MemoryStore::new());
        let mut store = open_store(backend, clock()).await;

        let alice = store.add_contact(NewContact::new("Alice"));
        let prayer = store.add_prayer(NewPrayer::new("Health", vec![alice.id.clone()]));
        store.mark_prayer_as_viewed(&prayer.id);
        store.load().await;

        assert_eq!(store.contacts().len(), 1);
        assert_eq!(store.contact(&alice.id).map(|c| c.name.as_str()), Some("Alice"));
        assert_eq!(store.prayers().len(), 1);
        assert!(store.is_viewed_today(&prayer.id));
    }

    #[tokio::test]
    async fn test_bulk_operations_on_empty_store_are_noops() {
        let backend = Arc::new(MemoryStore::new());
        let mut store = open_store(backend.clone(), clock()).await;
        store.flush().await;
        let writes_before = backend.write_log().len();
        let mut rx = store.subscribe();

        store.reset_viewed_prayers();
        store.clear_contacts();
        store.clear_prayers();
        store.clear_all_data();
        store.flush().await;

        assert!(rx.try_recv().is_err());
        assert_eq!(backend.write_log().len(), writes_before);
    }

    #[tokio::test]
    async fn test_clear_prayers_emits_only_what_changed() {
        let backend = Arc::new(MemoryStore::new());
        let mut store = open_store(backend, clock()).await;
        store.add_prayer(NewPrayer::new("Health", vec![]));
        let mut rx = store.subscribe();

        store.clear_prayers();

        assert_eq!(rx.try_recv().unwrap(), StoreEvent::PrayersChanged);
        assert!(rx.try_recv().is_err());
    }
}
