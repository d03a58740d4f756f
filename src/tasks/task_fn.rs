//! # Function-backed task (`TaskFn`)
//!
//! [`TaskFn`] wraps a closure `F: Fn(A) -> Fut`, producing a fresh future per
//! spawn. No state is shared between attempts unless the closure captures an
//! `Arc<...>` explicitly.
//!
//! ## Example
//! ```rust
//! use recoverify::{Task, TaskFn, TaskRef};
//!
//! let t: TaskRef<(), &'static str, String> = TaskFn::arc("worker", |()| async move {
//!     Ok::<_, String>("done")
//! });
//!
//! assert_eq!(t.name(), "worker");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use crate::tasks::task::{BoxTaskFuture, Task};

/// Async closure-backed task.
#[derive(Debug)]
pub struct TaskFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> TaskFn<F> {
    /// Creates a new function-backed task.
    ///
    /// Prefer [`TaskFn::arc`] when you immediately need a [`TaskRef`](crate::TaskRef).
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self { name: name.into(), f }
    }

    /// Creates the task and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<A, T, E, F, Fut> Task<A, T, E> for TaskFn<F>
where
    F: Fn(A) -> Fut + Send + Sync + 'static, // Fn, not FnMut
    Fut: Future<Output = Result<T, E>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn spawn(&self, args: A) -> BoxTaskFuture<T, E> {
        Box::pin((self.f)(args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn each_spawn_runs_the_closure_again() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let task = TaskFn::new("count", move |step: u32| {
            let c = Arc::clone(&c);
            async move { Ok::<_, ()>(c.fetch_add(step, Ordering::SeqCst) + step) }
        });

        assert_eq!(task.spawn(1).await, Ok(1));
        assert_eq!(task.spawn(2).await, Ok(3));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(Task::<u32, u32, ()>::name(&task), "count");
    }
}
