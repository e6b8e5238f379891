//! Contact operations on the record store.

use log::debug;

use super::RecordStore;
use crate::domain::{Contact, ContactPatch, NewContact, Prayer};
use crate::events::StoreEvent;
use crate::id::generate_id;

impl RecordStore {
    /// Create a contact with a fresh id and timestamps.
    pub fn add_contact(&mut self, input: NewContact) -> Contact {
        let contact = Contact::from_new(input, generate_id(), self.clock.now());
        debug!("Adding contact {} ({})", contact.id, contact.name);

        self.contacts.push(contact.clone());
        self.persist_contacts();
        self.events.emit(StoreEvent::ContactsChanged);
        contact
    }

    /// Apply `patch` to the contact with `id`. Unknown ids are a no-op.
    ///
    /// Returns true if a contact was updated.
    pub fn update_contact(&mut self, id: &str, patch: ContactPatch) -> bool {
        let now = self.clock.now();
        let Some(contact) = self.contacts.iter_mut().find(|c| c.id == id) else {
            debug!("update_contact: no contact {}", id);
            return false;
        };

        patch.apply(contact);
        contact.updated_at = now.max(contact.created_at);

        self.persist_contacts();
        self.events.emit(StoreEvent::ContactsChanged);
        true
    }

    /// Remove a contact and cascade into the prayers that reference it.
    ///
    /// Prayers whose only contact was `id` are deleted; prayers with other
    /// contacts lose the reference and get a new `updated_at`. Prayers not
    /// linked to `id` are left untouched.
    pub fn delete_contact(&mut self, id: &str) -> bool {
        let before = self.contacts.len();
        self.contacts.retain(|c| c.id != id);
        let removed = self.contacts.len() != before;
        let prayers_changed = self.detach_contact(id);

        if !removed && !prayers_changed {
            debug!("delete_contact: no contact {}", id);
            return false;
        }

        debug!("Deleted contact {}", id);
        self.persist_contacts();
        self.persist_prayers();
        self.events.emit(StoreEvent::ContactsChanged);
        self.events.emit(StoreEvent::PrayersChanged);
        true
    }

    /// Remove every contact, cascading into prayers as `delete_contact` does.
    /// Prayers linked to no contact at all are kept.
    pub fn clear_contacts(&mut self) {
        if self.contacts.is_empty() {
            return;
        }

        let ids: Vec<String> = self.contacts.iter().map(|c| c.id.clone()).collect();
        let mut prayers_changed = false;
        for id in &ids {
            prayers_changed |= self.detach_contact(id);
        }
        self.contacts.clear();
        debug!("Cleared {} contacts", ids.len());

        self.persist_contacts();
        self.events.emit(StoreEvent::ContactsChanged);
        if prayers_changed {
            self.persist_prayers();
            self.events.emit(StoreEvent::PrayersChanged);
        }
    }

    /// Prayers linked to `contact_id`, in collection order.
    pub fn get_prayers_for_contact(&self, contact_id: &str) -> Vec<&Prayer> {
        self.prayers.iter().filter(|p| p.references(contact_id)).collect()
    }

    /// Drop `contact_id` from every prayer. Returns true if any prayer changed.
    fn detach_contact(&mut self, contact_id: &str) -> bool {
        let now = self.clock.now();
        let mut changed = false;

        self.prayers.retain_mut(|prayer| {
            if !prayer.references(contact_id) {
                return true;
            }
            changed = true;
            prayer.contact_ids.retain(|c| c != contact_id);
            if prayer.contact_ids.is_empty() {
                debug!("Deleting prayer {} with no remaining contacts", prayer.id);
                return false;
            }
            prayer.updated_at = now.max(prayer.created_at);
            true
        });

        changed
    }
}
