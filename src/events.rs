//! Change notifications and the persistence-failure channel.
//!
//! The UI re-renders on `*Changed` events instead of polling. Storage write
//! failures never reach the caller of a mutation; they surface here as
//! `PersistFailed` for anyone who subscribes.

use tokio::sync::broadcast;

/// Default capacity of the broadcast channel.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Something observable happened to store state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// The contact collection changed
    ContactsChanged,
    /// The prayer collection changed
    PrayersChanged,
    /// The viewed-today set changed
    ViewedChanged,
    /// A durable write or remove for `key` failed
    PersistFailed { key: String, message: String },
}

/// Broadcast hub shared by the store, tracker and persistence worker.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<StoreEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publish an event to all current subscribers
    pub fn emit(&self, event: StoreEvent) {
        // Ignore send errors (no subscribers is fine)
        let _ = self.tx.send(event);
    }

    /// Get a receiver for events published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_without_subscribers_is_fine() {
        let bus = EventBus::default();
        bus.emit(StoreEvent::ContactsChanged);
    }

    #[tokio::test]
    async fn test_subscriber_receives_events_in_order() {
        let bus = EventBus::new(8);
        let mut rx = bus.subscribe();

        bus.emit(StoreEvent::ContactsChanged);
        bus.emit(StoreEvent::PersistFailed {
            key: "k".to_string(),
            message: "boom".to_string(),
        });

        assert_eq!(rx.recv().await.unwrap(), StoreEvent::ContactsChanged);
        assert_eq!(
            rx.recv().await.unwrap(),
            StoreEvent::PersistFailed {
                key: "k".to_string(),
                message: "boom".to_string()
            }
        );
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let bus = EventBus::new(0);
        let mut rx = bus.subscribe();
        bus.emit(StoreEvent::ViewedChanged);
        assert_eq!(rx.try_recv().unwrap(), StoreEvent::ViewedChanged);
    }
}
