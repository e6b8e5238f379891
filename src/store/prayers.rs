//! Prayer operations on the record store.

use log::debug;

use super::RecordStore;
use crate::domain::{Contact, NewPrayer, Prayer, PrayerPatch};
use crate::events::StoreEvent;
use crate::id::generate_id;

impl RecordStore {
    /// Create a prayer with a fresh id and timestamps.
    ///
    /// `contact_ids` are stored as given; they are not checked against the
    /// contact collection.
    pub fn add_prayer(&mut self, input: NewPrayer) -> Prayer {
        let prayer = Prayer::from_new(input, generate_id(), self.clock.now());
        debug!("Adding prayer {} for {} contacts", prayer.id, prayer.contact_ids.len());

        self.prayers.push(prayer.clone());
        self.persist_prayers();
        self.events.emit(StoreEvent::PrayersChanged);
        prayer
    }

    /// Apply `patch` to the prayer with `id`. Unknown ids are a no-op.
    ///
    /// `date_answered` changes only if the patch says so.
    pub fn update_prayer(&mut self, id: &str, patch: PrayerPatch) -> bool {
        let now = self.clock.now();
        let Some(prayer) = self.prayers.iter_mut().find(|p| p.id == id) else {
            debug!("update_prayer: no prayer {}", id);
            return false;
        };

        patch.apply(prayer);
        prayer.updated_at = now.max(prayer.created_at);

        self.persist_prayers();
        self.events.emit(StoreEvent::PrayersChanged);
        true
    }

    /// Mark a prayer answered or reopen it.
    ///
    /// Answering stamps `date_answered` with the current time; reopening
    /// clears it. Setting the state it already has changes nothing.
    pub fn set_prayer_answered(&mut self, id: &str, answered: bool) -> bool {
        let now = self.clock.now();
        let patch = match self.prayer(id) {
            None => {
                debug!("set_prayer_answered: no prayer {}", id);
                return false;
            }
            Some(prayer) if prayer.is_answered == answered => return false,
            Some(_) if answered => PrayerPatch::default().is_answered(true).date_answered(Some(now)),
            Some(_) => PrayerPatch::default().is_answered(false).date_answered(None),
        };

        self.update_prayer(id, patch)
    }

    /// Remove a prayer. Its id is left in the viewed set, where it no longer
    /// matches anything.
    pub fn delete_prayer(&mut self, id: &str) -> bool {
        let before = self.prayers.len();
        self.prayers.retain(|p| p.id != id);
        if self.prayers.len() == before {
            debug!("delete_prayer: no prayer {}", id);
            return false;
        }

        self.persist_prayers();
        self.events.emit(StoreEvent::PrayersChanged);
        true
    }

    /// Contacts linked to the prayer, in contact collection order.
    ///
    /// Dangling contact ids are skipped. Unknown prayer ids give an empty list.
    pub fn get_contacts_for_prayer(&self, prayer_id: &str) -> Vec<&Contact> {
        let Some(prayer) = self.prayer(prayer_id) else {
            return Vec::new();
        };
        self.contacts.iter().filter(|c| prayer.references(&c.id)).collect()
    }

    /// Prayers that have not been answered, in collection order.
    pub fn unanswered_prayers(&self) -> Vec<&Prayer> {
        self.prayers.iter().filter(|p| !p.is_answered).collect()
    }
}
