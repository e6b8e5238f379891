//! Prayer reel session.
//!
//! The reel pages through unanswered prayers one at a time. A session opens
//! at the first prayer not yet viewed today and marks every prayer that
//! becomes the dominant visible item. The item on screen is also marked when
//! scrolling settles and when the session closes, so a missed visibility
//! callback never leaves a shown prayer unmarked.

use log::debug;

use crate::domain::Prayer;
use crate::store::RecordStore;

/// Share of the viewport an item must cover to become the current item.
pub const DEFAULT_VISIBILITY_THRESHOLD: f32 = 0.5;

/// One entry of a visibility callback from the list view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewableItem {
    pub index: usize,
    /// Fraction of the item inside the viewport, 0.0 to 1.0
    pub visible_fraction: f32,
}

/// Unanswered prayers in collection order.
pub fn reel_items(prayers: &[Prayer]) -> Vec<&Prayer> {
    prayers.iter().filter(|p| !p.is_answered).collect()
}

/// Position of the first item not viewed today, or 0 when every item has
/// been viewed or there are none.
pub fn start_index(items: &[&Prayer], viewed: &[String]) -> usize {
    items
        .iter()
        .position(|p| !viewed.iter().any(|id| *id == p.id))
        .unwrap_or(0)
}

/// State of one open reel.
#[derive(Debug, Clone)]
pub struct ReelSession {
    items: Vec<String>,
    current: usize,
    threshold: f32,
}

impl ReelSession {
    /// Open a reel over the store's unanswered prayers and mark the first item shown.
    pub fn open(store: &mut RecordStore, threshold: f32) -> Self {
        let items = reel_items(store.prayers());
        let current = start_index(&items, store.viewed_prayers_today());
        let items: Vec<String> = items.into_iter().map(|p| p.id.clone()).collect();
        debug!("Opening reel with {} prayers at {}", items.len(), current);

        let session = Self {
            items,
            current,
            threshold,
        };
        session.mark_current(store);
        session
    }

    /// Prayer ids in reel order.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_prayer_id(&self) -> Option<&str> {
        self.items.get(self.current).map(String::as_str)
    }

    /// Handle a visibility change. Returns true if the current item moved.
    ///
    /// The dominant item is the one with the largest visible fraction at or
    /// above the threshold. On a tie the current item stays; otherwise the
    /// lowest index wins, whatever order the items were reported in.
    pub fn on_viewable_items_changed(&mut self, store: &mut RecordStore, viewable: &[ViewableItem]) -> bool {
        let current = self.current;
        let dominant = viewable
            .iter()
            .filter(|v| v.index < self.items.len() && v.visible_fraction >= self.threshold)
            .max_by(|a, b| {
                a.visible_fraction
                    .total_cmp(&b.visible_fraction)
                    .then_with(|| (a.index == current).cmp(&(b.index == current)))
                    .then_with(|| b.index.cmp(&a.index))
            });

        match dominant {
            Some(item) if item.index != self.current => {
                self.current = item.index;
                self.mark_current(store);
                true
            }
            _ => false,
        }
    }

    /// Scrolling came to rest on the current item.
    pub fn on_scroll_settle(&self, store: &mut RecordStore) {
        self.mark_current(store);
    }

    /// Mark the current prayer answered and drop it from the reel.
    ///
    /// The item after it, if any, takes its place and is marked viewed.
    pub fn mark_current_answered(&mut self, store: &mut RecordStore) -> bool {
        let Some(id) = self.items.get(self.current).cloned() else {
            return false;
        };
        if !store.set_prayer_answered(&id, true) {
            return false;
        }

        self.items.remove(self.current);
        if self.current >= self.items.len() {
            self.current = self.items.len().saturating_sub(1);
        }
        self.mark_current(store);
        true
    }

    /// Tear the session down, marking the item left on screen.
    pub fn close(self, store: &mut RecordStore) {
        self.mark_current(store);
        debug!("Closed reel at {}", self.current);
    }

    fn mark_current(&self, store: &mut RecordStore) {
        if let Some(id) = self.current_prayer_id() {
            store.mark_prayer_as_viewed(id);
        }
    }
}
