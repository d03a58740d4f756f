//! # Task abstraction.
//!
//! A [`Task`] is anything that can be invoked with forwarded arguments `A` and
//! produces a fresh future per call. The same trait describes recovery steps:
//! a recovery is just a `Task<A, (), E>` whose success value carries nothing.
//!
//! Each call to [`Task::spawn`] must build a **new** future; the invoker calls it
//! once per attempt and never polls a finished future again.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Boxed future returned by [`Task::spawn`].
pub type BoxTaskFuture<T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'static>>;

/// Shared handle to a task.
pub type TaskRef<A, T, E> = Arc<dyn Task<A, T, E>>;

/// Shared handle to a recovery step (a task with a discarded result).
pub type RecoveryRef<A, E> = Arc<dyn Task<A, (), E>>;

/// # Named unit of work with forwarded arguments.
///
/// # Example
/// ```
/// use recoverify::{BoxTaskFuture, Task};
///
/// struct Fetch;
///
/// impl Task<u32, String, std::io::Error> for Fetch {
///     fn name(&self) -> &str { "fetch" }
///
///     fn spawn(&self, id: u32) -> BoxTaskFuture<String, std::io::Error> {
///         Box::pin(async move { Ok(format!("item-{id}")) })
///     }
/// }
/// ```
pub trait Task<A, T, E>: Send + Sync + 'static {
    /// Returns a stable, human-readable name (used in events).
    fn name(&self) -> &str;

    /// Creates a new future running one invocation with `args`.
    fn spawn(&self, args: A) -> BoxTaskFuture<T, E>;
}
