//! # Retrying: the retry/recovery loop.
//!
//! Wraps one [`Task`] with:
//! - up to `count` sequential attempts,
//! - an optional recovery step after each failed attempt,
//! - a fixed delay per [`DelayMode`](crate::DelayMode),
//! - an `on_error` observer,
//! - optional event publishing to a [`Bus`].
//!
//! ## State machine
//! ```text
//!              ┌───────── ok ─────────► SUCCEEDED
//!              │
//! ATTEMPTING ──┼── err, recovery ─────► RECOVERING ── ok / tolerated err ──► ATTEMPTING
//!     ▲        │                            │
//!     │        │                            └── err, !handle_recovery ─────► ABORTED
//!     │        └── err, no recovery ──┐
//!     └──────── attempt < count ──────┤
//!                                     └── attempt == count ───────────────► EXHAUSTED
//! ```
//!
//! ## Rules
//! - Attempts run **sequentially** (never concurrent within one call)
//! - Failures and the attempt counter live **inside each call**; concurrent calls
//!   of the same `Retrying` never see each other's state
//! - Failures are recorded in order: task failure, then recovery failure, per attempt
//! - Exactly one outcome per call: the task's value or one [`RetryError`]

use std::fmt::{self, Display};
use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::time;

use crate::{
    config::RetryConfig,
    core::{
        builder::RetryBuilder,
        hook::{self, ErrorHook},
        runner::{self, StepKinds},
    },
    error::{Failure, RetryError, Termination},
    events::{Bus, Event, EventKind},
    tasks::{BoxTaskFuture, RecoveryRef, Task, TaskRef},
};

/// A task wrapped with retry and recovery.
///
/// Built with [`Retrying::builder`]. Cheap to clone; every clone shares the
/// same task, recovery, configuration and observer.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use recoverify::Retrying;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let calls = Arc::new(AtomicU32::new(0));
/// let counter = Arc::clone(&calls);
///
/// let fetch = Retrying::builder()
///     .task(move |id: u32| {
///         let counter = Arc::clone(&counter);
///         async move {
///             if counter.fetch_add(1, Ordering::SeqCst) == 0 {
///                 Err("connection reset".to_string())
///             } else {
///                 Ok(format!("item-{id}"))
///             }
///         }
///     })
///     .count(3)
///     .build()?;
///
/// assert_eq!(fetch.call(7).await.unwrap(), "item-7");
/// assert_eq!(calls.load(Ordering::SeqCst), 2);
/// # Ok(())
/// # }
/// ```
pub struct Retrying<A, T, E> {
    pub(crate) task: TaskRef<A, T, E>,
    pub(crate) recovery: Option<RecoveryRef<A, E>>,
    pub(crate) config: Arc<RetryConfig>,
    pub(crate) on_error: Option<ErrorHook<E>>,
    pub(crate) bus: Option<Bus>,
}

impl<A, T, E> Retrying<A, T, E>
where
    A: 'static,
    T: 'static,
    E: 'static,
{
    /// Starts building a new invoker.
    pub fn builder() -> RetryBuilder<A, T, E> {
        RetryBuilder::new()
    }

    /// Returns the configuration the invoker was built with.
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Returns the wrapped task's name.
    pub fn name(&self) -> &str {
        self.task.name()
    }

    /// Whether a recovery step is configured.
    pub fn has_recovery(&self) -> bool {
        self.recovery.is_some()
    }
}

impl<A, T, E> Retrying<A, T, E>
where
    A: Clone + Send + 'static,
    T: Send + 'static,
    E: Display + Send + 'static,
{
    /// Runs the retry loop for one call with `args`.
    ///
    /// `args` is cloned once for every task and recovery invocation. The
    /// returned future owns everything it needs, so it can be spawned.
    ///
    /// ### Flow per attempt
    /// 1. Wait `delay` if the delay mode applies to this attempt
    /// 2. Run the task; return its value on success
    /// 3. Record the failure, notify `on_error`
    /// 4. Run recovery (if configured); record its failure, abort unless `handle_recovery`
    ///
    /// # Errors
    /// Returns [`RetryError`] with [`Termination::Exhausted`] when all attempts
    /// failed, or [`Termination::Aborted`] when a recovery failure was not tolerated.
    pub fn call(&self, args: A) -> impl Future<Output = Result<T, RetryError<E>>> + Send + 'static {
        let this = self.clone();
        async move { this.run(args).await }
    }

    /// Converts the invoker into a plain closure with the same calling convention.
    pub fn into_fn(
        self,
    ) -> impl Fn(A) -> BoxFuture<'static, Result<T, RetryError<E>>> + Clone + Send + Sync + 'static
    {
        move |args| self.call(args).boxed()
    }

    async fn run(self, args: A) -> Result<T, RetryError<E>> {
        let bus = self.bus.as_ref();
        let mut failures: Vec<Failure<E>> = Vec::new();
        let mut attempt: u32 = 0;

        while attempt < self.config.count {
            attempt += 1;

            if let Some(delay) = self.config.delay_before(attempt) {
                runner::publish(bus, || {
                    Event::new(EventKind::DelayScheduled)
                        .with_task(self.task.name())
                        .with_attempt(attempt)
                        .with_delay(delay)
                });
                time::sleep(delay).await;
            }

            let res = runner::run_once(
                self.task.as_ref(),
                args.clone(),
                attempt,
                StepKinds::TASK,
                bus,
            )
            .await;

            match res {
                Ok(value) => return Ok(value),
                Err(e) => failures.push(Failure::task(attempt, e)),
            }
            if let (Some(on_error), Some(last)) = (&self.on_error, failures.last()) {
                self.observe(on_error.as_ref(), &last.error, attempt);
            }

            let Some(recovery) = &self.recovery else {
                continue;
            };
            let res = runner::run_once(
                recovery.as_ref(),
                args.clone(),
                attempt,
                StepKinds::RECOVERY,
                bus,
            )
            .await;

            if let Err(e) = res {
                failures.push(Failure::recovery(attempt, e));
                if !self.config.handle_recovery {
                    return Err(self.finish(failures, attempt, Termination::Aborted));
                }
            }
        }

        Err(self.finish(failures, attempt, Termination::Exhausted))
    }

    /// Runs the observer; a panic is reported on the bus and otherwise ignored.
    fn observe(&self, on_error: &(dyn Fn(&E) + Send + Sync), error: &E, attempt: u32) {
        if let Err(info) = hook::notify(on_error, error) {
            runner::publish(self.bus.as_ref(), || {
                Event::new(EventKind::ObserverPanicked)
                    .with_task(self.task.name())
                    .with_attempt(attempt)
                    .with_reason(info)
            });
        }
    }

    fn finish(
        &self,
        failures: Vec<Failure<E>>,
        attempt: u32,
        termination: Termination,
    ) -> RetryError<E> {
        let err = RetryError::new(failures, attempt, termination);
        let kind = match termination {
            Termination::Exhausted => EventKind::RetriesExhausted,
            Termination::Aborted => EventKind::RetryAborted,
        };
        runner::publish(self.bus.as_ref(), || {
            Event::new(kind)
                .with_task(self.task.name())
                .with_attempt(attempt)
                .with_reason(err.as_message())
        });
        err
    }
}

impl<A, T, E> Clone for Retrying<A, T, E> {
    fn clone(&self) -> Self {
        Self {
            task: Arc::clone(&self.task),
            recovery: self.recovery.clone(),
            config: Arc::clone(&self.config),
            on_error: self.on_error.clone(),
            bus: self.bus.clone(),
        }
    }
}

impl<A, T, E> fmt::Debug for Retrying<A, T, E>
where
    A: 'static,
    T: 'static,
    E: 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Retrying")
            .field("task", &self.task.name())
            .field("recovery", &self.recovery.as_ref().map(|r| r.name()))
            .field("config", &self.config)
            .field("on_error", &self.on_error.is_some())
            .field("bus", &self.bus.is_some())
            .finish()
    }
}

/// A wrapped task is itself a task, so retry layers can be nested.
impl<A, T, E> Task<A, T, RetryError<E>> for Retrying<A, T, E>
where
    A: Clone + Send + 'static,
    T: Send + 'static,
    E: Display + Send + 'static,
{
    fn name(&self) -> &str {
        self.task.name()
    }

    fn spawn(&self, args: A) -> BoxTaskFuture<T, RetryError<E>> {
        Box::pin(self.call(args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Stage;
    use crate::tasks::TaskFn;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn counting_failures(
        calls: &Arc<AtomicU32>,
        fail_first: u32,
    ) -> impl Fn(()) -> BoxFuture<'static, Result<u32, String>> + Send + Sync + 'static {
        let calls = Arc::clone(calls);
        move |()| {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n <= fail_first {
                    Err(format!("fail #{n}"))
                } else {
                    Ok(n)
                }
            }
            .boxed()
        }
    }

    #[test]
    fn accessors_and_debug_report_named_steps() {
        let fetch: TaskRef<(), u32, String> =
            TaskFn::arc("fetch", |()| async { Ok::<_, String>(1u32) });
        let r = Retrying::builder()
            .with_task(fetch)
            .recovery(|()| async { Ok::<_, String>(()) })
            .count(2)
            .build()
            .unwrap();

        assert_eq!(r.name(), "fetch");
        assert!(r.has_recovery());
        assert_eq!(r.config().count, 2);

        let dbg = format!("{r:?}");
        assert!(dbg.contains("\"fetch\""), "{dbg}");
        assert!(dbg.contains("Some(\"recovery\")"), "{dbg}");
    }

    #[tokio::test]
    async fn success_on_first_attempt_skips_recovery() {
        let task_calls = Arc::new(AtomicU32::new(0));
        let recovery_calls = Arc::new(AtomicU32::new(0));
        let rc = Arc::clone(&recovery_calls);

        let r = Retrying::builder()
            .task(counting_failures(&task_calls, 0))
            .recovery(move |()| {
                rc.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, String>(()) }
            })
            .count(3)
            .build()
            .unwrap();

        assert_eq!(r.call(()).await.unwrap(), 1);
        assert_eq!(task_calls.load(Ordering::SeqCst), 1);
        assert_eq!(recovery_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn each_failure_carries_its_attempt_number() {
        let calls = Arc::new(AtomicU32::new(0));
        let r = Retrying::builder()
            .task(counting_failures(&calls, u32::MAX))
            .count(3)
            .build()
            .unwrap();

        let err = r.call(()).await.unwrap_err();
        assert_eq!(err.termination(), Termination::Exhausted);
        assert_eq!(err.attempts(), 3);
        let attempts: Vec<u32> = err.failures().iter().map(|f| f.attempt).collect();
        assert_eq!(attempts, vec![1, 2, 3]);
        assert!(err.failures().iter().all(|f| f.stage == Stage::Task));
    }

    #[tokio::test]
    async fn calls_do_not_share_state() {
        let calls = Arc::new(AtomicU32::new(0));
        let r = Retrying::builder()
            .task(counting_failures(&calls, u32::MAX))
            .count(2)
            .build()
            .unwrap();

        assert_eq!(r.call(()).await.unwrap_err().len(), 2);
        assert_eq!(r.call(()).await.unwrap_err().len(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn events_follow_the_state_machine() {
        let bus = Bus::new(64);
        let mut rx = bus.subscribe();
        let calls = Arc::new(AtomicU32::new(0));

        let r = Retrying::builder()
            .task(counting_failures(&calls, 1))
            .recovery(|()| async { Ok::<_, String>(()) })
            .count(2)
            .with_bus(bus)
            .build()
            .unwrap();
        assert_eq!(r.call(()).await.unwrap(), 2);

        let mut kinds = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            kinds.push(ev.kind);
        }
        assert_eq!(
            kinds,
            vec![
                EventKind::AttemptStarting,
                EventKind::AttemptFailed,
                EventKind::RecoveryStarting,
                EventKind::RecoverySucceeded,
                EventKind::AttemptStarting,
                EventKind::AttemptSucceeded,
            ]
        );
    }

    #[tokio::test]
    async fn aborted_call_publishes_terminal_event() {
        let bus = Bus::new(64);
        let mut rx = bus.subscribe();

        let r = Retrying::builder()
            .task(|()| async { Err::<(), _>("fail".to_string()) })
            .recovery(|()| async { Err::<(), _>("recovery fail".to_string()) })
            .count(3)
            .with_bus(bus)
            .build()
            .unwrap();
        let err = r.call(()).await.unwrap_err();
        assert_eq!(err.termination(), Termination::Aborted);

        let mut last = None;
        while let Ok(ev) = rx.try_recv() {
            last = Some(ev);
        }
        let last = last.expect("events");
        assert_eq!(last.kind, EventKind::RetryAborted);
        assert_eq!(last.attempt, Some(1));
        assert!(last.is_terminal());
    }

    #[tokio::test]
    async fn panicking_observer_does_not_disturb_the_loop() {
        let bus = Bus::new(64);
        let mut rx = bus.subscribe();

        let r = Retrying::builder()
            .task(|()| async { Err::<(), _>("fail".to_string()) })
            .on_error(|e: &String| panic!("observer saw {e}"))
            .count(2)
            .with_bus(bus)
            .build()
            .unwrap();
        let err = r.call(()).await.unwrap_err();
        assert_eq!(err.into_errors(), vec!["fail".to_string(), "fail".to_string()]);

        let mut panics = 0;
        while let Ok(ev) = rx.try_recv() {
            if ev.kind == EventKind::ObserverPanicked {
                assert_eq!(ev.reason.as_deref(), Some("observer saw fail"));
                panics += 1;
            }
        }
        assert_eq!(panics, 2);
    }

    #[tokio::test]
    async fn nested_retrying_is_a_task() {
        let calls = Arc::new(AtomicU32::new(0));
        let inner: TaskRef<(), u32, RetryError<String>> = Arc::new(
            Retrying::builder()
                .task(counting_failures(&calls, 3))
                .count(2)
                .build()
                .unwrap(),
        );

        let outer = Retrying::builder()
            .with_task(inner)
            .count(2)
            .build()
            .unwrap();

        assert_eq!(outer.call(()).await.unwrap(), 4);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn into_fn_keeps_the_calling_convention() {
        let call = Retrying::builder()
            .task(|x: u32| async move { Ok::<_, String>(x * 2) })
            .build()
            .unwrap()
            .into_fn();

        let again = call.clone();
        assert_eq!(call(4).await.unwrap(), 8);
        assert_eq!(again(5).await.unwrap(), 10);
    }
}
