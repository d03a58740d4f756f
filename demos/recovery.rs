//! # Example: recovery
//!
//! A task talks to a "connection" that drops after every request. A recovery
//! step reconnects between attempts. The first reconnect fails; because
//! `handle_recovery` is on, that failure is recorded and the loop goes on.
//!
//! ## Flow
//! ```text
//! call("SELECT 1")
//!   ├─► attempt 1 → Err(not connected)
//!   ├─► recovery  → Err(reconnect refused)      tolerated, recorded
//!   ├─► attempt 2 → Err(not connected)
//!   ├─► recovery  → Ok(())                      connection restored
//!   └─► attempt 3 → Ok("row for SELECT 1")
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example recovery
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use recoverify::{RecoveryRef, Retrying, TaskFn, TaskRef};

#[derive(Default)]
struct Connection {
    up: AtomicBool,
    reconnects: AtomicU32,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let conn = Arc::new(Connection::default());
    let (for_query, for_reconnect) = (Arc::clone(&conn), Arc::clone(&conn));

    let query: TaskRef<&'static str, String, String> = TaskFn::arc("query", move |sql: &'static str| {
        let conn = Arc::clone(&for_query);
        async move {
            if conn.up.swap(false, Ordering::SeqCst) {
                Ok(format!("row for {sql}"))
            } else {
                Err(format!("not connected ({sql})"))
            }
        }
    });
    let reconnect: RecoveryRef<&'static str, String> = TaskFn::arc("reconnect", move |_sql: &'static str| {
        let conn = Arc::clone(&for_reconnect);
        async move {
            if conn.reconnects.fetch_add(1, Ordering::SeqCst) == 0 {
                return Err("reconnect refused".to_string());
            }
            conn.up.store(true, Ordering::SeqCst);
            Ok(())
        }
    });

    let db = Retrying::builder()
        .with_task(query.clone())
        .with_recovery(reconnect.clone())
        .handle_recovery(true)
        .count(3)
        .build()?;

    let row = db.call("SELECT 1").await?;
    println!("[main] {row}");

    // The connection dropped again. Without `handle_recovery`, the refused
    // reconnect ends the call right away, even though attempts remain.
    conn.reconnects.store(0, Ordering::SeqCst);
    let strict = Retrying::builder()
        .with_task(query)
        .with_recovery(reconnect)
        .count(3)
        .build()?;
    if let Err(err) = strict.call("SELECT 2").await {
        println!("[main] {}", err.as_message());
    }
    Ok(())
}
