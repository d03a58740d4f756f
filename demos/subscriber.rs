//! # Example: subscriber
//!
//! Shows how to observe retry events: a custom subscriber counts attempts,
//! failures and recoveries, while the built-in `LogWriter` prints every event.
//!
//! ## Run
//! ```bash
//! cargo run --example subscriber --features logging
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use async_trait::async_trait;
use recoverify::{Bus, Event, EventKind, LogWriter, Retrying, Subscribe, SubscriberSet};

struct MetricsSubscriber {
    attempts: AtomicU64,
    failures: AtomicU64,
    recoveries: AtomicU64,
}

impl MetricsSubscriber {
    fn new() -> Self {
        Self {
            attempts: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            recoveries: AtomicU64::new(0),
        }
    }

    fn print_stats(&self) {
        println!();
        println!("Metrics:");
        println!(" ├─► Attempts:   {}", self.attempts.load(Ordering::Relaxed));
        println!(" ├─► Failures:   {}", self.failures.load(Ordering::Relaxed));
        println!(" └─► Recoveries: {}", self.recoveries.load(Ordering::Relaxed));
    }
}

#[async_trait]
impl Subscribe for MetricsSubscriber {
    async fn on_event(&self, ev: &Event) {
        match ev.kind {
            EventKind::AttemptStarting => {
                self.attempts.fetch_add(1, Ordering::Relaxed);
            }
            EventKind::AttemptFailed => {
                self.failures.fetch_add(1, Ordering::Relaxed);
            }
            EventKind::RecoverySucceeded => {
                self.recoveries.fetch_add(1, Ordering::Relaxed);
            }
            _ => {}
        }
    }

    fn name(&self) -> &'static str {
        "metrics"
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let bus = Bus::new(256);
    let metrics = Arc::new(MetricsSubscriber::new());
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::clone(&metrics) as _, Arc::new(LogWriter::new())];
    let set = SubscriberSet::listen(subs, bus.clone());

    let counter = Arc::new(AtomicU32::new(0));
    let flaky = Retrying::builder()
        .task(move |()| {
            let attempt = counter.fetch_add(1, Ordering::Relaxed) + 1;
            async move {
                if attempt <= 3 {
                    Err(format!("attempt {attempt} failed"))
                } else {
                    Ok(attempt)
                }
            }
        })
        .recovery(|()| async { Ok::<_, String>(()) })
        .count(5)
        .with_bus(bus)
        .build()?;

    let attempt = flaky.call(()).await?;
    println!("[main] succeeded on attempt {attempt}");

    set.shutdown().await;
    metrics.print_stats();
    Ok(())
}
