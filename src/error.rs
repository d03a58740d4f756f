//! Error types produced by the retry invoker.
//!
//! This module defines:
//!
//! - [`ConfigError`] — raised synchronously by [`RetryBuilder::build`](crate::RetryBuilder::build)
//!   when the invoker cannot be constructed.
//! - [`RetryError`] — the aggregated failure returned by a call once the loop gives up.
//!   It wraps every [`Failure`] observed during that call, in chronological order.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logs/metrics.

use std::fmt;

use thiserror::Error;

/// # Errors raised while building an invoker.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No task was supplied to the builder.
    #[error("task is required")]
    MissingTask,

    /// `count` was zero; at least one attempt is required.
    #[error("attempt count must be at least 1")]
    ZeroCount,
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use recoverify::ConfigError;
    ///
    /// assert_eq!(ConfigError::MissingTask.as_label(), "config_missing_task");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::MissingTask => "config_missing_task",
            ConfigError::ZeroCount => "config_zero_count",
        }
    }
}

/// Which step of an attempt produced a [`Failure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// The task itself failed.
    Task,
    /// The recovery step that followed a failed task failed too.
    Recovery,
}

impl Stage {
    /// Returns a short stable label.
    pub fn as_label(&self) -> &'static str {
        match self {
            Stage::Task => "task",
            Stage::Recovery => "recovery",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// One recorded failure: the error value plus where and when it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure<E> {
    /// Step that failed.
    pub stage: Stage,
    /// Attempt number (1-based) the failure belongs to.
    pub attempt: u32,
    /// The error value exactly as the task or recovery returned it.
    pub error: E,
}

impl<E> Failure<E> {
    pub(crate) fn task(attempt: u32, error: E) -> Self {
        Self {
            stage: Stage::Task,
            attempt,
            error,
        }
    }

    pub(crate) fn recovery(attempt: u32, error: E) -> Self {
        Self {
            stage: Stage::Recovery,
            attempt,
            error,
        }
    }

    /// Consumes the record and returns the bare error.
    pub fn into_error(self) -> E {
        self.error
    }
}

impl<E: fmt::Display> fmt::Display for Failure<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} failed on attempt {}: {}",
            self.stage, self.attempt, self.error
        )
    }
}

/// How a failed call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Termination {
    /// Every allowed attempt was used without success.
    Exhausted,
    /// A recovery step failed while `handle_recovery` was off; remaining attempts were skipped.
    Aborted,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::Exhausted => f.write_str("retries exhausted"),
            Termination::Aborted => f.write_str("retry aborted by recovery failure"),
        }
    }
}

/// # Aggregated failure of one call.
///
/// The only error a [`Retrying`](crate::Retrying) call ever returns. It always
/// holds at least one [`Failure`], ordered as they happened: for each attempt the
/// task failure comes first, followed by the recovery failure (if any).
///
/// No synthetic "too many tries" entry is appended; inspect [`termination`](Self::termination)
/// to learn why the loop stopped.
#[derive(Error, Debug, Clone)]
#[error("{termination}: {} failure(s) over {attempts} attempt(s)", .failures.len())]
pub struct RetryError<E> {
    failures: Vec<Failure<E>>,
    attempts: u32,
    termination: Termination,
}

impl<E> RetryError<E> {
    pub(crate) fn new(failures: Vec<Failure<E>>, attempts: u32, termination: Termination) -> Self {
        debug_assert!(!failures.is_empty(), "aggregated failure must not be empty");
        Self {
            failures,
            attempts,
            termination,
        }
    }

    /// Why the loop stopped.
    pub fn termination(&self) -> Termination {
        self.termination
    }

    /// Number of task attempts made before giving up.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// All recorded failures, oldest first.
    pub fn failures(&self) -> &[Failure<E>] {
        &self.failures
    }

    /// Iterates over the bare error values, oldest first.
    pub fn errors(&self) -> impl Iterator<Item = &E> {
        self.failures.iter().map(|f| &f.error)
    }

    /// Iterates over failures raised by the task.
    pub fn task_failures(&self) -> impl Iterator<Item = &Failure<E>> {
        self.failures.iter().filter(|f| f.stage == Stage::Task)
    }

    /// Iterates over failures raised by the recovery step.
    pub fn recovery_failures(&self) -> impl Iterator<Item = &Failure<E>> {
        self.failures.iter().filter(|f| f.stage == Stage::Recovery)
    }

    /// The most recent failure.
    pub fn last(&self) -> Option<&Failure<E>> {
        self.failures.last()
    }

    /// Number of recorded failures (never zero).
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// Whether no failures were recorded. A returned error always holds at least one.
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Consumes the error and returns the recorded failures.
    pub fn into_failures(self) -> Vec<Failure<E>> {
        self.failures
    }

    /// Consumes the error and returns the bare error values.
    pub fn into_errors(self) -> Vec<E> {
        self.failures.into_iter().map(Failure::into_error).collect()
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self.termination {
            Termination::Exhausted => "retry_exhausted",
            Termination::Aborted => "retry_aborted",
        }
    }
}

impl<E: fmt::Display> RetryError<E> {
    /// Returns a human-readable message listing every failure.
    pub fn as_message(&self) -> String {
        let details: Vec<String> = self.failures.iter().map(ToString::to_string).collect();
        format!("{}: [{}]", self.termination, details.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RetryError<&'static str> {
        RetryError::new(
            vec![
                Failure::task(1, "fail"),
                Failure::recovery(1, "recovery fail"),
                Failure::task(2, "fail"),
            ],
            2,
            Termination::Exhausted,
        )
    }

    #[test]
    fn display_summarises_termination_and_counts() {
        assert_eq!(
            sample().to_string(),
            "retries exhausted: 3 failure(s) over 2 attempt(s)"
        );
    }

    #[test]
    fn message_lists_each_failure_in_order() {
        assert_eq!(
            sample().as_message(),
            "retries exhausted: [task failed on attempt 1: fail; \
             recovery failed on attempt 1: recovery fail; task failed on attempt 2: fail]"
        );
    }

    #[test]
    fn stage_filters() {
        let err = sample();
        assert_eq!(err.task_failures().count(), 2);
        assert_eq!(err.recovery_failures().count(), 1);
        assert_eq!(err.last().map(|f| f.stage), Some(Stage::Task));
    }

    #[test]
    fn into_errors_keeps_order() {
        assert_eq!(sample().into_errors(), vec!["fail", "recovery fail", "fail"]);
    }

    #[test]
    fn labels() {
        assert_eq!(sample().as_label(), "retry_exhausted");
        let aborted = RetryError::new(vec![Failure::task(1, "x")], 1, Termination::Aborted);
        assert_eq!(aborted.as_label(), "retry_aborted");
        assert_eq!(ConfigError::ZeroCount.as_label(), "config_zero_count");
    }
}
