use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;

use crate::{
    config::{DelayMode, RetryConfig},
    core::{hook::ErrorHook, invoker::Retrying},
    error::ConfigError,
    events::Bus,
    tasks::{RecoveryRef, SyncFn, TaskFn, TaskRef},
};

/// Builder for constructing a [`Retrying`] invoker.
///
/// The task is required; everything else has a default (see [`RetryConfig`]).
/// Closures passed to [`task`](Self::task) / [`recovery`](Self::recovery) are
/// named `"task"` and `"recovery"` in events; use [`with_task`](Self::with_task)
/// with a named [`TaskFn`] to choose another name.
pub struct RetryBuilder<A, T, E> {
    task: Option<TaskRef<A, T, E>>,
    recovery: Option<RecoveryRef<A, E>>,
    config: RetryConfig,
    on_error: Option<ErrorHook<E>>,
    bus: Option<Bus>,
}

impl<A, T, E> RetryBuilder<A, T, E> {
    /// Creates an empty builder with default configuration.
    pub fn new() -> Self {
        Self {
            task: None,
            recovery: None,
            config: RetryConfig::default(),
            on_error: None,
            bus: None,
        }
    }

    /// Sets the task from a shared handle.
    pub fn with_task(mut self, task: TaskRef<A, T, E>) -> Self {
        self.task = Some(task);
        self
    }

    /// Sets the recovery step from a shared handle.
    pub fn with_recovery(mut self, recovery: RecoveryRef<A, E>) -> Self {
        self.recovery = Some(recovery);
        self
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: RetryConfig) -> Self {
        self.config = config;
        self
    }

    /// Maximum number of task attempts (`>= 1`).
    pub fn count(mut self, count: u32) -> Self {
        self.config.count = count;
        self
    }

    /// Fixed wait applied before attempts (`Duration::ZERO` = none).
    pub fn delay(mut self, delay: Duration) -> Self {
        self.config.delay = delay;
        self
    }

    /// Whether the first attempt is delayed too.
    pub fn delay_mode(mut self, mode: DelayMode) -> Self {
        self.config.delay_mode = mode;
        self
    }

    /// Tolerate recovery failures instead of aborting the call.
    pub fn handle_recovery(mut self, handle: bool) -> Self {
        self.config.handle_recovery = handle;
        self
    }

    /// Observer called synchronously with each task failure.
    ///
    /// Panics inside the observer are contained and reported as
    /// [`EventKind::ObserverPanicked`](crate::EventKind::ObserverPanicked).
    pub fn on_error<F>(mut self, f: F) -> Self
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(f));
        self
    }

    /// Publishes lifecycle events of every call to `bus`.
    pub fn with_bus(mut self, bus: Bus) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Builds the invoker.
    ///
    /// # Errors
    /// - [`ConfigError::MissingTask`] if no task was set
    /// - [`ConfigError::ZeroCount`] if `count` is zero
    pub fn build(self) -> Result<Retrying<A, T, E>, ConfigError> {
        let task = self.task.ok_or(ConfigError::MissingTask)?;
        if self.config.count == 0 {
            return Err(ConfigError::ZeroCount);
        }
        Ok(Retrying {
            task,
            recovery: self.recovery,
            config: Arc::new(self.config),
            on_error: self.on_error,
            bus: self.bus,
        })
    }
}

impl<A, T, E> RetryBuilder<A, T, E>
where
    A: 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    /// Sets the task from an async closure.
    pub fn task<F, Fut>(self, f: F) -> Self
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        self.with_task(TaskFn::arc("task", f))
    }

    /// Sets the task from a synchronous closure.
    pub fn sync_task<F>(self, f: F) -> Self
    where
        F: Fn(A) -> Result<T, E> + Send + Sync + 'static,
    {
        self.with_task(SyncFn::arc("task", f))
    }

    /// Sets the recovery step from an async closure; its success value is discarded.
    pub fn recovery<F, Fut, R>(self, f: F) -> Self
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, E>> + Send + 'static,
    {
        self.with_recovery(TaskFn::arc("recovery", move |args| {
            f(args).map(|res| res.map(drop))
        }))
    }

    /// Sets the recovery step from a synchronous closure; its success value is discarded.
    pub fn sync_recovery<F, R>(self, f: F) -> Self
    where
        F: Fn(A) -> Result<R, E> + Send + Sync + 'static,
    {
        self.with_recovery(SyncFn::arc("recovery", move |args| f(args).map(drop)))
    }
}

impl<A, T, E> Default for RetryBuilder<A, T, E> {
    fn default() -> Self {
        Self::new()
    }
}
