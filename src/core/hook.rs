//! # Panic-isolated `on_error` observer.
//!
//! The hook runs synchronously right after a task failure is recorded. A panic
//! inside it is caught and handed back as a message; it never reaches the retry
//! loop and never touches the recorded failures.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Observer invoked with each task failure.
pub type ErrorHook<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Runs `hook` with `error`, returning the panic message if it panicked.
pub(crate) fn notify<E>(hook: &(dyn Fn(&E) + Send + Sync), error: &E) -> Result<(), String> {
    panic::catch_unwind(AssertUnwindSafe(|| hook(error))).map_err(|p| panic_message(p.as_ref()))
}

/// Extracts a readable message from a panic payload.
pub(crate) fn panic_message(any: &(dyn Any + Send)) -> String {
    if let Some(msg) = any.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = any.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
