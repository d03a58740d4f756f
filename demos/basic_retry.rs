//! # Example: basic_retry
//!
//! A flaky task fails twice before succeeding. With `count = 3` and a fixed
//! 100ms delay between attempts, the third attempt returns the value.
//!
//! ## Flow
//! ```text
//! call(())
//!   ├─► attempt 1 → Err("boom #1")   on_error prints it
//!   ├─► sleep(100ms)
//!   ├─► attempt 2 → Err("boom #2")
//!   ├─► sleep(100ms)
//!   └─► attempt 3 → Ok(3)
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example basic_retry
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use recoverify::{DelayMode, Retrying};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let attempts = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&attempts);

    let flaky = Retrying::builder()
        .task(move |()| {
            let attempt = counter.fetch_add(1, Ordering::Relaxed) + 1;
            async move {
                println!("[flaky] attempt {attempt}");
                if attempt <= 2 {
                    Err(format!("boom #{attempt}"))
                } else {
                    Ok(attempt)
                }
            }
        })
        .on_error(|e: &String| println!("[flaky] failed: {e}"))
        .count(3)
        .delay(Duration::from_millis(100))
        .delay_mode(DelayMode::BetweenAttempts)
        .build()?;

    let value = flaky.call(()).await?;
    println!("[main] succeeded on attempt {value}");

    // A single-attempt invoker reports the one failure it saw.
    let once = Retrying::builder()
        .sync_task(|path: &'static str| std::fs::read_to_string(path))
        .build()?;
    match once.call("/definitely/not/here").await {
        Ok(_) => println!("[main] unexpectedly read the file"),
        Err(err) => println!("[main] {}", err.as_message()),
    }
    Ok(())
}
