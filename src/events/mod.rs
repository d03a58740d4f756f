//! Retry events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to events emitted while a call is retried.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: the invoker loop (attempt/recovery/terminal events),
//!   `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: [`SubscriberSet::listen`](crate::SubscriberSet::listen) or any
//!   receiver obtained from [`Bus::subscribe`].

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
