//! Retry core: the invoker and its helpers.
//!
//! The public API from this module is [`Retrying`] and its [`RetryBuilder`].
//!
//! Internal modules:
//! - [`invoker`]: the retry/recovery loop, one fresh state per call;
//! - [`runner`]: executes one task or recovery step and publishes its events;
//! - [`hook`]: panic-isolated `on_error` observer;
//! - [`builder`]: validates settings and assembles a [`Retrying`].

mod builder;
pub(crate) mod hook;
mod invoker;
mod runner;

pub use builder::RetryBuilder;
pub use hook::ErrorHook;
pub use invoker::Retrying;
