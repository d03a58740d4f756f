//! # Non-blocking event fan-out to multiple subscribers.
//!
//! Provides [`SubscriberSet`], which distributes events to multiple subscribers
//! concurrently without blocking the publisher.
//!
//! ## Architecture
//! ```text
//! Bus ──► listener ──► emit(event)
//!                         │
//!                         ├──► [queue 1] ──► worker 1 ──► subscriber1.on_event()
//!                         │    (bounded)         └──────► panic → SubscriberPanicked
//!                         └──► [queue N] ──► worker N ──► subscriberN.on_event()
//! ```
//!
//! ## Rules
//! - **Overflow**: event dropped for that subscriber only, `SubscriberOverflow` published
//! - **Non-blocking**: `emit()` returns immediately (uses `try_send`)
//! - **Isolation**: a slow or panicking subscriber doesn't affect others
//! - **Per-subscriber FIFO**: each subscriber sees events in order
//!
//! `AssertUnwindSafe` is used around subscriber futures; a subscriber that panics
//! while holding a lock may leave its own state inconsistent.

use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::core::hook::panic_message;
use crate::events::{Bus, Event, EventKind};
use crate::subscribers::Subscribe;

/// Per-subscriber channel metadata.
struct SubscriberChannel {
    name: &'static str,
    sender: mpsc::Sender<Arc<Event>>,
}

/// Queues shared between the set and its bus listener.
struct Fanout {
    channels: Vec<SubscriberChannel>,
    bus: Bus,
}

impl Fanout {
    fn emit_arc(&self, event: Arc<Event>) {
        let is_overflow_evt = matches!(event.kind, EventKind::SubscriberOverflow);

        for channel in &self.channels {
            let reason = match channel.sender.try_send(Arc::clone(&event)) {
                Ok(()) => continue,
                Err(mpsc::error::TrySendError::Full(_)) => "full",
                Err(mpsc::error::TrySendError::Closed(_)) => "closed",
            };
            // Overflow reports are never re-reported, or a full queue would loop.
            if !is_overflow_evt {
                self.bus
                    .publish(Event::subscriber_overflow(channel.name, reason));
            }
        }
    }
}

/// Background task forwarding bus events into the fan-out.
struct Listener {
    stop: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

/// Fan-out coordinator for multiple event subscribers.
///
/// - **Concurrent delivery**: events sent to all subscribers
/// - **Isolation**: each subscriber has a dedicated queue and worker
/// - **Panic safety**: panics caught and reported as `SubscriberPanicked`
/// - **Overflow handling**: dropped events reported via `SubscriberOverflow`
///
/// Must be created inside a Tokio runtime (workers are spawned immediately).
pub struct SubscriberSet {
    fanout: Arc<Fanout>,
    workers: Vec<JoinHandle<()>>,
    listener: Option<Listener>,
}

impl SubscriberSet {
    /// Creates a new set and spawns one worker task per subscriber.
    ///
    /// Events are delivered only through [`emit`](Self::emit); use
    /// [`listen`](Self::listen) to feed the set from a bus automatically.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>, bus: Bus) -> Self {
        let mut channels = Vec::with_capacity(subs.len());
        let mut workers = Vec::with_capacity(subs.len());

        for sub in subs {
            let cap = sub.queue_capacity().max(1);
            let name = sub.name();
            let (tx, mut rx) = mpsc::channel::<Arc<Event>>(cap);
            let bus_for_worker = bus.clone();

            let handle = tokio::spawn(async move {
                while let Some(ev) = rx.recv().await {
                    let fut = sub.on_event(ev.as_ref());

                    if let Err(panic_err) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
                        let info = panic_message(panic_err.as_ref());
                        bus_for_worker.publish(Event::subscriber_panicked(sub.name(), info));
                    }
                }
            });
            channels.push(SubscriberChannel { name, sender: tx });
            workers.push(handle);
        }
        Self {
            fanout: Arc::new(Fanout { channels, bus }),
            workers,
            listener: None,
        }
    }

    /// Creates a set and a listener task that forwards every event published on
    /// `bus` (after this call) to the subscribers.
    ///
    /// Lagged events are skipped.
    #[must_use]
    pub fn listen(subs: Vec<Arc<dyn Subscribe>>, bus: Bus) -> Self {
        let mut rx = bus.subscribe();
        let mut set = Self::new(subs, bus);
        let fanout = Arc::clone(&set.fanout);
        let (stop, mut stopped) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    res = rx.recv() => match res {
                        Ok(ev) => fanout.emit_arc(Arc::new(ev)),
                        Err(broadcast::error::RecvError::Lagged(_)) => continue,
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                    _ = &mut stopped => {
                        while let Ok(ev) = rx.try_recv() {
                            fanout.emit_arc(Arc::new(ev));
                        }
                        break;
                    }
                }
            }
        });

        set.listener = Some(Listener { stop, handle });
        set
    }

    /// Emits an event to all subscribers (clones the event).
    pub fn emit(&self, event: &Event) {
        self.fanout.emit_arc(Arc::new(event.clone()));
    }

    /// Emits a pre-allocated `Arc<Event>` to all subscribers.
    pub fn emit_arc(&self, event: Arc<Event>) {
        self.fanout.emit_arc(event);
    }

    /// Gracefully shuts down the listener and all subscriber workers.
    ///
    /// 1. Stops the listener after it forwards events already on the bus
    /// 2. Drops all queue senders (workers see channel closed)
    /// 3. Awaits all workers, so queued events are fully handled
    pub async fn shutdown(self) {
        if let Some(listener) = self.listener {
            let _ = listener.stop.send(());
            let _ = listener.handle.await;
        }
        drop(self.fanout);

        for h in self.workers {
            let _ = h.await;
        }
    }
}
