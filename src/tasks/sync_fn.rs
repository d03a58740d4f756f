//! # Synchronous closure-backed task (`SyncFn`)
//!
//! Runs `F: Fn(A) -> Result<T, E>` inline when spawned and hands the result back
//! as an already-completed future, so synchronous work goes through the same
//! retry loop as async work.
//!
//! The closure runs on the polling thread; keep it short or move heavy work to
//! `tokio::task::spawn_blocking` inside a [`TaskFn`](crate::TaskFn) instead.

use std::borrow::Cow;
use std::sync::Arc;

use futures::future;

use crate::tasks::task::{BoxTaskFuture, Task};

/// Synchronous closure-backed task.
#[derive(Debug)]
pub struct SyncFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> SyncFn<F> {
    /// Creates a new synchronous task.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self { name: name.into(), f }
    }

    /// Creates the task and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<A, T, E, F> Task<A, T, E> for SyncFn<F>
where
    F: Fn(A) -> Result<T, E> + Send + Sync + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn spawn(&self, args: A) -> BoxTaskFuture<T, E> {
        Box::pin(future::ready((self.f)(args)))
    }
}
