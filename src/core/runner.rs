//! # Run a single step of an attempt.
//!
//! Executes one invocation of a task or recovery and publishes its lifecycle
//! events to the optional [`Bus`].
//!
//! ## Event flow
//! ```text
//! Task:
//!   AttemptStarting → spawn() → Ok  → AttemptSucceeded
//!                             → Err → AttemptFailed
//! Recovery:
//!   RecoveryStarting → spawn() → Ok  → RecoverySucceeded
//!                              → Err → RecoveryFailed
//! ```
//!
//! ## Rules
//! - Always publishes **exactly one** terminal event per step
//! - Errors are returned untouched; recording them is the caller's job

use std::fmt::Display;

use crate::{
    events::{Bus, Event, EventKind},
    tasks::Task,
};

/// Event kinds published for one kind of step.
#[derive(Clone, Copy, Debug)]
pub(crate) struct StepKinds {
    starting: EventKind,
    succeeded: EventKind,
    failed: EventKind,
}

impl StepKinds {
    pub(crate) const TASK: Self = Self {
        starting: EventKind::AttemptStarting,
        succeeded: EventKind::AttemptSucceeded,
        failed: EventKind::AttemptFailed,
    };

    pub(crate) const RECOVERY: Self = Self {
        starting: EventKind::RecoveryStarting,
        succeeded: EventKind::RecoverySucceeded,
        failed: EventKind::RecoveryFailed,
    };
}

/// Executes `step` once with `args`, publishing lifecycle events to `bus`.
pub(crate) async fn run_once<S, A, R, E>(
    step: &S,
    args: A,
    attempt: u32,
    kinds: StepKinds,
    bus: Option<&Bus>,
) -> Result<R, E>
where
    S: Task<A, R, E> + ?Sized,
    E: Display,
{
    publish(bus, || {
        Event::new(kinds.starting)
            .with_task(step.name())
            .with_attempt(attempt)
    });

    let res = step.spawn(args).await;

    match &res {
        Ok(_) => publish(bus, || {
            Event::new(kinds.succeeded)
                .with_task(step.name())
                .with_attempt(attempt)
        }),
        Err(e) => publish(bus, || {
            Event::new(kinds.failed)
                .with_task(step.name())
                .with_attempt(attempt)
                .with_reason(e.to_string())
        }),
    }
    res
}

/// Publishes the event built by `ev` if a bus is attached.
#[inline]
pub(crate) fn publish(bus: Option<&Bus>, ev: impl FnOnce() -> Event) {
    if let Some(bus) = bus {
        bus.publish(ev());
    }
}
