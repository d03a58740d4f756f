//! # Task abstractions.
//!
//! This module provides the callable types the invoker drives:
//! - [`Task`] - trait for a named, retryable unit of work taking forwarded arguments
//! - [`TaskFn`] - async closure-backed task
//! - [`SyncFn`] - synchronous closure-backed task
//! - [`TaskRef`] / [`RecoveryRef`] - shared handles (`Arc<dyn Task>`)

mod sync_fn;
mod task;
mod task_fn;

pub use sync_fn::SyncFn;
pub use task::{BoxTaskFuture, RecoveryRef, Task, TaskRef};
pub use task_fn::TaskFn;
