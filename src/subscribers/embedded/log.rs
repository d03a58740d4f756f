//! # LogWriter — simple event printer
//!
//! A minimal subscriber that prints incoming [`Event`]s to stdout.
//! Use it for tests or demos.
//!
//! ## Example output
//! ```text
//! [delay] task="fetch" attempt=2 delay_ms=100
//! [starting] task="fetch" attempt=2
//! [failed] task="fetch" attempt=2 err="connection refused"
//! [recovery] task="reconnect" attempt=2
//! [recovered] task="reconnect" attempt=2
//! [succeeded] task="fetch" attempt=3
//! [exhausted] task="fetch" attempts=3 err="..."
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let task = e.task.as_deref().unwrap_or("unknown");
        let reason = e.reason.as_deref().unwrap_or("");
        match e.kind {
            EventKind::DelayScheduled => {
                println!(
                    "[delay] task={task:?} attempt={:?} delay_ms={:?}",
                    e.attempt, e.delay_ms
                );
            }
            EventKind::AttemptStarting => {
                println!("[starting] task={task:?} attempt={:?}", e.attempt);
            }
            EventKind::AttemptSucceeded => {
                println!("[succeeded] task={task:?} attempt={:?}", e.attempt);
            }
            EventKind::AttemptFailed => {
                println!("[failed] task={task:?} attempt={:?} err={reason:?}", e.attempt);
            }
            EventKind::RecoveryStarting => {
                println!("[recovery] task={task:?} attempt={:?}", e.attempt);
            }
            EventKind::RecoverySucceeded => {
                println!("[recovered] task={task:?} attempt={:?}", e.attempt);
            }
            EventKind::RecoveryFailed => {
                println!(
                    "[recovery-failed] task={task:?} attempt={:?} err={reason:?}",
                    e.attempt
                );
            }
            EventKind::RetriesExhausted => {
                println!("[exhausted] task={task:?} attempts={:?} err={reason:?}", e.attempt);
            }
            EventKind::RetryAborted => {
                println!("[aborted] task={task:?} attempt={:?} err={reason:?}", e.attempt);
            }
            EventKind::ObserverPanicked => {
                println!("[observer-panicked] task={task:?} info={reason}");
            }
            EventKind::SubscriberOverflow => {
                println!("[subscriber-overflow] subscriber={task} reason={reason}");
            }
            EventKind::SubscriberPanicked => {
                println!("[subscriber-panicked] subscriber={task} info={reason}");
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn prints_every_kind_without_panicking() {
        let w = LogWriter::new();
        for kind in [
            EventKind::DelayScheduled,
            EventKind::AttemptStarting,
            EventKind::AttemptSucceeded,
            EventKind::AttemptFailed,
            EventKind::RecoveryStarting,
            EventKind::RecoverySucceeded,
            EventKind::RecoveryFailed,
            EventKind::RetriesExhausted,
            EventKind::RetryAborted,
            EventKind::ObserverPanicked,
            EventKind::SubscriberOverflow,
            EventKind::SubscriberPanicked,
        ] {
            w.on_event(&Event::new(kind).with_task("t").with_attempt(1)).await;
        }
        assert_eq!(w.name(), "LogWriter");
    }
}
