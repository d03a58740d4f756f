//! # Events emitted while a call is retried.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Attempt events**: the task and recovery lifecycle inside one call
//! - **Terminal events**: how a failed call ended (exhausted or aborted)
//! - **Observer events**: problems isolated from the loop (panicking hooks/subscribers)
//!
//! The [`Event`] struct carries metadata such as timestamps, task name,
//! attempt number, delays and reasons.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use recoverify::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::AttemptFailed)
//!     .with_task("fetch")
//!     .with_reason("connection refused")
//!     .with_attempt(2);
//!
//! assert_eq!(ev.kind, EventKind::AttemptFailed);
//! assert_eq!(ev.task.as_deref(), Some("fetch"));
//! assert_eq!(ev.attempt, Some(2));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of retry events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Attempt events ===
    /// Waiting before an attempt.
    ///
    /// Sets: `task`, `attempt` (the attempt about to run), `delay_ms`.
    DelayScheduled,

    /// Task attempt is starting.
    ///
    /// Sets: `task`, `attempt` (1-based).
    AttemptStarting,

    /// Task attempt returned a value; the call resolves with it.
    ///
    /// Sets: `task`, `attempt`.
    AttemptSucceeded,

    /// Task attempt failed; the failure was recorded.
    ///
    /// Sets: `task`, `attempt`, `reason`.
    AttemptFailed,

    /// Recovery is starting after a failed attempt.
    ///
    /// Sets: `task` (recovery name), `attempt`.
    RecoveryStarting,

    /// Recovery completed; the loop moves to the next attempt.
    ///
    /// Sets: `task` (recovery name), `attempt`.
    RecoverySucceeded,

    /// Recovery failed; the failure was recorded.
    ///
    /// Sets: `task` (recovery name), `attempt`, `reason`.
    RecoveryFailed,

    // === Terminal events ===
    /// Every attempt failed.
    ///
    /// Sets: `task`, `attempt` (last attempt), `reason` (aggregated message).
    RetriesExhausted,

    /// A recovery failure ended the call before the attempts ran out.
    ///
    /// Sets: `task`, `attempt`, `reason` (aggregated message).
    RetryAborted,

    // === Observer events ===
    /// The `on_error` hook panicked; the panic was contained.
    ///
    /// Sets: `task`, `attempt`, `reason` (panic message).
    ObserverPanicked,

    /// Subscriber panicked during event processing.
    ///
    /// Sets: `task` (subscriber name), `reason` (panic message).
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets: `task` (subscriber name), `reason` ("full" or "closed").
    SubscriberOverflow,
}

/// Retry event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Name of the task, recovery, or subscriber involved.
    pub task: Option<Arc<str>>,
    /// Attempt number (starting from 1).
    pub attempt: Option<u32>,
    /// Delay before the attempt in milliseconds (compact).
    pub delay_ms: Option<u32>,
    /// Human-readable reason (errors, panic info, overflow details).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            task: None,
            attempt: None,
            delay_ms: None,
            reason: None,
        }
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a task name.
    #[inline]
    pub fn with_task(mut self, task: impl Into<Arc<str>>) -> Self {
        self.task = Some(task.into());
        self
    }

    /// Attaches a delay (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.delay_ms = Some(ms);
        self
    }

    /// Attaches an attempt number.
    #[inline]
    pub fn with_attempt(mut self, n: u32) -> Self {
        self.attempt = Some(n);
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_task(subscriber)
            .with_reason(reason)
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_task(subscriber)
            .with_reason(info)
    }

    /// Whether this event reports a terminal failure of a call.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.kind,
            EventKind::RetriesExhausted | EventKind::RetryAborted
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_numbers_increase() {
        let a = Event::new(EventKind::AttemptStarting);
        let b = Event::new(EventKind::AttemptStarting);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn delay_saturates_at_u32_ms() {
        let ev = Event::new(EventKind::DelayScheduled).with_delay(Duration::from_secs(u64::MAX / 2));
        assert_eq!(ev.delay_ms, Some(u32::MAX));
    }

    #[test]
    fn terminal_kinds() {
        assert!(Event::new(EventKind::RetryAborted).is_terminal());
        assert!(!Event::new(EventKind::RecoveryFailed).is_terminal());
    }
}
