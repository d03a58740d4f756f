//! # Event bus for broadcasting retry events.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`] that provides
//! non-blocking event publishing from any number of concurrent calls.
//!
//! ## Architecture
//! ```text
//! Publishers (many):                 Receivers (any):
//!   call #1 ──┐
//!   call #2 ──┼──────► Bus ───────► SubscriberSet::listen ────► subscribers
//!   call #N ──┘  (broadcast chan)   Bus::subscribe() receivers
//! ```
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never blocks and never fails the caller.
//! - **Bounded capacity**: a single ring buffer stores recent events for all receivers.
//! - **Lag handling**: slow receivers get `RecvError::Lagged(n)` and skip `n` oldest items.
//! - **No persistence**: events are lost if there are no receivers at send time.

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for retry events.
///
/// ### Properties
/// - **Non-blocking**: `publish()` returns immediately.
/// - **Fire-and-forget**: no delivery or durability guarantees.
/// - **Cloneable**: cheap to clone (internally holds an `Arc`-backed sender).
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a new bus with the given channel capacity (clamped to at least 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, _rx) = broadcast::channel::<Event>(capacity);
        Self { tx }
    }

    /// Publishes an event to all active receivers.
    ///
    /// If there are no receivers, the event is dropped.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Creates a new receiver that will observe subsequent events.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

impl Default for Bus {
    /// A bus with capacity 1024.
    fn default() -> Self {
        Self::new(1024)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[tokio::test]
    async fn receivers_see_events_published_after_subscribing() {
        let bus = Bus::new(8);
        bus.publish(Event::new(EventKind::AttemptStarting));

        let mut rx = bus.subscribe();
        bus.publish(Event::new(EventKind::AttemptFailed).with_attempt(1));

        let ev = rx.recv().await.expect("event");
        assert_eq!(ev.kind, EventKind::AttemptFailed);
        assert_eq!(ev.attempt, Some(1));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn default_bus_delivers_to_every_receiver() {
        let bus = Bus::default();
        let (mut a, mut b) = (bus.subscribe(), bus.subscribe());
        bus.publish(Event::new(EventKind::RecoveryStarting));

        assert_eq!(a.recv().await.expect("event").kind, EventKind::RecoveryStarting);
        assert_eq!(b.recv().await.expect("event").kind, EventKind::RecoveryStarting);
    }

    #[test]
    fn publish_without_receivers_is_silent() {
        let bus = Bus::new(0);
        bus.publish(Event::new(EventKind::RetriesExhausted));
    }
}
