//! # Navigation Events
//!
//! Explicit subscription to room transitions.
//!
//! ## Delivery
//!
//! ```text
//! NavigationController ──emit──► EventHub ──► callback #1
//!                                        ├──► channel  #2 ──► Receiver (other thread)
//!                                        └──► callback #3
//! ```
//!
//! Dispatch is synchronous and in registration order. Channel subscribers
//! use bounded crossbeam channels and never block the emitter: a full
//! channel drops the event, a disconnected one is pruned.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use delve_procedural::RoomSeed;

use crate::navigation::Arrival;

/// Something that happened to the room chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavigationEvent {
    /// A room was built and is now current.
    RoomEntered {
        /// Chain position of the new room.
        index: usize,
        /// Seed it was built from.
        seed: RoomSeed,
        /// Direction the player came from.
        arrival: Arrival,
    },
    /// Forward was requested from the last room of the chain.
    LimitReached {
        /// Position of the current (last) room.
        index: usize,
    },
    /// Back was requested from the first room (or before any room).
    AtStart,
    /// The current room was torn down ahead of a transition.
    RoomDiscarded {
        /// Chain position of the discarded room.
        index: usize,
        /// Seed it was built from.
        seed: RoomSeed,
    },
}

/// Handle returned by a subscription, used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(&NavigationEvent) + Send>;

enum Subscriber {
    Callback(Callback),
    Channel(Sender<NavigationEvent>),
}

/// Ordered set of event subscribers.
#[derive(Default)]
pub struct EventHub {
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_id: u64,
    dropped: u64,
}

impl EventHub {
    /// Creates a hub with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Registers a callback, invoked synchronously on every event.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&NavigationEvent) + Send + 'static,
    {
        let id = self.allocate_id();
        self.subscribers.push((id, Subscriber::Callback(Box::new(callback))));
        id
    }

    /// Registers a bounded channel and returns its receiving end.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Events buffered before new ones are dropped.
    pub fn subscribe_channel(&mut self, capacity: usize) -> (SubscriptionId, Receiver<NavigationEvent>) {
        let (sender, receiver) = bounded(capacity);
        let id = self.allocate_id();
        self.subscribers.push((id, Subscriber::Channel(sender)));
        (id, receiver)
    }

    /// Removes a subscriber. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
        self.subscribers.len() != before
    }

    /// Removes every subscriber.
    pub fn clear(&mut self) {
        self.subscribers.clear();
    }

    /// Number of registered subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// Returns true if nobody is subscribed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Events dropped on full channels since creation.
    #[must_use]
    pub const fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Delivers an event to every subscriber in registration order.
    pub fn emit(&mut self, event: &NavigationEvent) {
        let mut dropped = 0;
        self.subscribers.retain_mut(|(id, subscriber)| match subscriber {
            Subscriber::Callback(callback) => {
                callback(event);
                true
            }
            Subscriber::Channel(sender) => match sender.try_send(event.clone()) {
                Ok(()) => true,
                Err(TrySendError::Full(_)) => {
                    dropped += 1;
                    tracing::warn!(subscription = id.0, "event channel full, dropping event");
                    true
                }
                Err(TrySendError::Disconnected(_)) => {
                    tracing::debug!(subscription = id.0, "event channel disconnected, unsubscribing");
                    false
                }
            },
        });
        self.dropped += dropped;
    }
}

impl std::fmt::Debug for EventHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventHub")
            .field("subscribers", &self.subscribers.len())
            .field("dropped", &self.dropped)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use parking_lot::Mutex;

    fn entered(index: usize) -> NavigationEvent {
        NavigationEvent::RoomEntered {
            index,
            seed: RoomSeed::new(index as i64).unwrap(),
            arrival: Arrival::Forward,
        }
    }

    #[test]
    fn test_callbacks_run_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut hub = EventHub::new();
        for name in ["first", "second", "third"] {
            let log = Arc::clone(&log);
            hub.subscribe(move |_| log.lock().push(name));
        }

        hub.emit(&NavigationEvent::AtStart);
        assert_eq!(*log.lock(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let count = Arc::new(Mutex::new(0));
        let mut hub = EventHub::new();
        let id = {
            let count = Arc::clone(&count);
            hub.subscribe(move |_| *count.lock() += 1)
        };

        hub.emit(&entered(0));
        assert!(hub.unsubscribe(id));
        assert!(!hub.unsubscribe(id), "second unsubscribe is a no-op");
        hub.emit(&entered(1));
        assert_eq!(*count.lock(), 1);
        assert!(hub.is_empty());
    }

    #[test]
    fn test_channel_receives_events() {
        let mut hub = EventHub::new();
        let (_, receiver) = hub.subscribe_channel(8);
        hub.emit(&entered(0));
        hub.emit(&NavigationEvent::LimitReached { index: 0 });

        assert_eq!(receiver.try_recv().unwrap(), entered(0));
        assert_eq!(
            receiver.try_recv().unwrap(),
            NavigationEvent::LimitReached { index: 0 }
        );
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn test_full_channel_drops_without_blocking() {
        let mut hub = EventHub::new();
        let (_, receiver) = hub.subscribe_channel(1);
        hub.emit(&entered(0));
        hub.emit(&entered(1));

        assert_eq!(hub.dropped(), 1);
        assert_eq!(hub.len(), 1, "full channels stay subscribed");
        assert_eq!(receiver.try_recv().unwrap(), entered(0));
    }

    #[test]
    fn test_disconnected_channel_is_pruned() {
        let mut hub = EventHub::new();
        let (_, receiver) = hub.subscribe_channel(4);
        hub.subscribe(|_| {});
        drop(receiver);

        hub.emit(&NavigationEvent::AtStart);
        assert_eq!(hub.len(), 1);
    }

    #[test]
    fn test_clear_removes_everything() {
        let mut hub = EventHub::new();
        hub.subscribe(|_| {});
        let _ = hub.subscribe_channel(2);
        hub.clear();
        assert!(hub.is_empty());
    }
}
