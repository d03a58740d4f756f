//! # recoverify
//!
//! **recoverify** wraps an async (or sync) unit of work so that it is retried up
//! to a fixed number of times, optionally running a recovery step between failed
//! attempts. When every attempt fails, the caller gets one aggregated error that
//! carries every failure observed, in the order they happened.
//!
//! ## Architecture
//! ```text
//!   Retrying::builder()
//!     .task(..) .recovery(..) .count(..) .delay(..) .on_error(..) .with_bus(..)
//!     .build()? ──► Retrying (Clone, reusable, safe to call concurrently)
//!
//!   retrying.call(args)          one call = one fresh failure list + attempt counter
//!
//! loop while attempt < count {
//!   ├─► attempt += 1
//!   ├─► sleep(delay)                          (per DelayMode)
//!   ├─► task(args.clone())
//!   │       ├─ Ok  ──► return value
//!   │       └─ Err ──► record Failure{Task}, on_error(&err)
//!   └─► recovery(args.clone())                (if configured)
//!           ├─ Ok  ──► continue
//!           └─ Err ──► record Failure{Recovery}
//!                      ├─ handle_recovery ──► continue
//!                      └─ otherwise       ──► return RetryError{Aborted}
//! }
//! return RetryError{Exhausted}
//! ```
//!
//! Every step can be published to a [`Bus`] as an [`Event`]; a [`SubscriberSet`]
//! fans those events out to [`Subscribe`] implementations.
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                       |
//! |-------------------|--------------------------------------------------------------|------------------------------------------|
//! | **Retry**         | Retry loop with recovery and aggregated failure.             | [`Retrying`], [`RetryBuilder`]           |
//! | **Configuration** | Attempt count, fixed delay, delay placement, recovery policy.| [`RetryConfig`], [`DelayMode`]           |
//! | **Tasks**         | Async or sync closures, or your own task types.              | [`Task`], [`TaskFn`], [`SyncFn`]         |
//! | **Errors**        | Construction errors and the aggregated failure.              | [`ConfigError`], [`RetryError`], [`Failure`] |
//! | **Events**        | Lifecycle events and their broadcast bus.                    | [`Event`], [`EventKind`], [`Bus`]        |
//! | **Subscribers**   | Hook into events (logging, metrics, custom handlers).        | [`Subscribe`], [`SubscriberSet`]         |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use recoverify::{Retrying, Termination};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let flaky = Retrying::builder()
//!         .task(|()| async { Err::<(), _>("fail".to_string()) })
//!         .recovery(|()| async { Err::<(), _>("recovery fail".to_string()) })
//!         .handle_recovery(true)
//!         .count(2)
//!         .build()?;
//!
//!     let err = flaky.call(()).await.unwrap_err();
//!     assert_eq!(err.termination(), Termination::Exhausted);
//!     assert_eq!(
//!         err.into_errors(),
//!         vec!["fail", "recovery fail", "fail", "recovery fail"]
//!     );
//!     Ok(())
//! }
//! ```
mod config;
mod core;
mod error;
mod events;
mod subscribers;
mod tasks;

// ---- Public re-exports ----

pub use config::{DelayMode, RetryConfig};
pub use crate::core::{ErrorHook, RetryBuilder, Retrying};
pub use error::{ConfigError, Failure, RetryError, Stage, Termination};
pub use events::{Bus, Event, EventKind};
pub use subscribers::{Subscribe, SubscriberSet};
pub use tasks::{BoxTaskFuture, RecoveryRef, SyncFn, Task, TaskFn, TaskRef};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
