//! # Retry configuration.
//!
//! Provides [`RetryConfig`], the immutable settings read once per call by
//! [`Retrying`](crate::Retrying).
//!
//! ## Sentinel values
//! - `delay = 0s` → no wait at all (treated as `None` by [`RetryConfig::delay`])
//!
//! ## Defaults
//! - `count = 1`: a single attempt, so retrying is opt-in
//! - `delay = 0s`
//! - `delay_mode = DelayMode::BeforeEachAttempt`
//! - `handle_recovery = false`: a failing recovery aborts the call

use std::time::Duration;

/// Where the fixed delay is applied relative to attempts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DelayMode {
    /// Wait before every attempt, the first one included (default).
    #[default]
    BeforeEachAttempt,
    /// Wait only before attempts after the first one.
    BetweenAttempts,
}

/// Settings for one retrying invoker.
///
/// ## Field semantics
/// - `count`: maximum number of task attempts (must be `>= 1`)
/// - `delay`: fixed wait applied according to `delay_mode` (`0s` = none)
/// - `delay_mode`: whether the first attempt is delayed too
/// - `handle_recovery`: tolerate recovery failures instead of aborting
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryConfig {
    /// Maximum number of task attempts.
    pub count: u32,

    /// Fixed wait before an attempt.
    ///
    /// - `Duration::ZERO` = no wait
    /// - `> 0` = applied per [`DelayMode`]
    pub delay: Duration,

    /// Placement of the delay.
    pub delay_mode: DelayMode,

    /// Whether a failing recovery is recorded and the loop continues (`true`),
    /// or the call aborts immediately with what was recorded so far (`false`).
    pub handle_recovery: bool,
}

impl RetryConfig {
    /// Returns the configured delay as an `Option`.
    ///
    /// - `None` → no wait
    /// - `Some(d)` → wait `d`
    #[inline]
    pub fn delay(&self) -> Option<Duration> {
        if self.delay == Duration::ZERO {
            None
        } else {
            Some(self.delay)
        }
    }

    /// Returns the wait to apply before the given 1-based attempt, if any.
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    /// use recoverify::{DelayMode, RetryConfig};
    ///
    /// let cfg = RetryConfig {
    ///     delay: Duration::from_millis(50),
    ///     delay_mode: DelayMode::BetweenAttempts,
    ///     ..RetryConfig::default()
    /// };
    /// assert_eq!(cfg.delay_before(1), None);
    /// assert_eq!(cfg.delay_before(2), Some(Duration::from_millis(50)));
    /// ```
    #[inline]
    pub fn delay_before(&self, attempt: u32) -> Option<Duration> {
        match self.delay_mode {
            DelayMode::BeforeEachAttempt => self.delay(),
            DelayMode::BetweenAttempts if attempt > 1 => self.delay(),
            DelayMode::BetweenAttempts => None,
        }
    }
}

impl Default for RetryConfig {
    /// Default configuration:
    ///
    /// - `count = 1`
    /// - `delay = 0s`
    /// - `delay_mode = DelayMode::BeforeEachAttempt`
    /// - `handle_recovery = false`
    fn default() -> Self {
        Self {
            count: 1,
            delay: Duration::ZERO,
            delay_mode: DelayMode::default(),
            handle_recovery: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_delay_is_none() {
        let cfg = RetryConfig::default();
        assert_eq!(cfg.delay(), None);
        assert_eq!(cfg.delay_before(1), None);
        assert_eq!(cfg.delay_before(5), None);
    }

    #[test]
    fn before_each_attempt_includes_first() {
        let cfg = RetryConfig {
            delay: Duration::from_millis(10),
            ..RetryConfig::default()
        };
        for attempt in 1..=4 {
            assert_eq!(cfg.delay_before(attempt), Some(Duration::from_millis(10)));
        }
    }

    #[test]
    fn between_attempts_skips_first() {
        let cfg = RetryConfig {
            count: 3,
            delay: Duration::from_millis(10),
            delay_mode: DelayMode::BetweenAttempts,
            handle_recovery: false,
        };
        assert_eq!(cfg.delay_before(1), None);
        assert_eq!(cfg.delay_before(2), Some(Duration::from_millis(10)));
        assert_eq!(cfg.delay_before(3), Some(Duration::from_millis(10)));
    }

    #[test]
    fn defaults() {
        let cfg = RetryConfig::default();
        assert_eq!(cfg.count, 1);
        assert!(!cfg.handle_recovery);
        assert_eq!(cfg.delay_mode, DelayMode::BeforeEachAttempt);
    }
}
