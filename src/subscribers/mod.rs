//! # Event subscribers.
//!
//! This module provides the [`Subscribe`] trait and the [`SubscriberSet`] fan-out
//! that delivers events from a [`Bus`](crate::Bus) to user-defined handlers.
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   Retrying::call ── publish(Event) ──► Bus ──► SubscriberSet listener
//!                                                     │
//!                                          ┌──────────┼──────────┐
//!                                          ▼          ▼          ▼
//!                                      [queue 1]  [queue 2]  [queue N]
//!                                          ▼          ▼          ▼
//!                                     LogWriter    Metrics    Custom
//! ```
//!
//! ## Implementing custom subscribers
//! ```no_run
//! use recoverify::{Event, EventKind, Subscribe};
//! use async_trait::async_trait;
//!
//! struct FailureCounter;
//!
//! #[async_trait]
//! impl Subscribe for FailureCounter {
//!     async fn on_event(&self, event: &Event) {
//!         if event.kind == EventKind::AttemptFailed {
//!             // increment failure counter
//!         }
//!     }
//! }
//! ```

#[cfg(feature = "logging")]
mod embedded;
mod subscribe;
mod subscriber_set;

#[cfg(feature = "logging")]
pub use embedded::LogWriter;
pub use subscribe::Subscribe;
pub use subscriber_set::SubscriberSet;
