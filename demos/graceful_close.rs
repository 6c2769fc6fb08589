//! # Example: graceful_close
//!
//! Three periodic tasks with different run times, closed on Ctrl-C (or after
//! three seconds). Events are printed by the built-in [`LogWriter`].
//!
//! ## Flow
//! ```text
//! TaskManager::builder(cfg).with_subscriber(LogWriter)
//!     ├─► add(fast,  200ms)    ──► [added] ... [starting] ... [stopped]
//!     ├─► add(slow,  500ms)
//!     ├─► add(flaky, 700ms)    ──► [failed] every other run
//!     └─► Ctrl-C / 3s ──► close()
//!           ├─► [close-requested] in_flight=N
//!           └─► [all-stopped-within-timeout]  or  [close-timeout]
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example graceful_close --features logging
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use tickvisor::{Config, LogWriter, TaskError, TaskFn, TaskManager, TaskRef};

fn worker(name: &'static str, work: Duration) -> TaskRef {
    TaskFn::arc(name, move || async move {
        tokio::time::sleep(work).await;
        Ok::<_, TaskError>(())
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::with_close_timeout(Duration::from_secs(2));
    let manager = TaskManager::builder(cfg)
        .with_subscriber(Arc::new(LogWriter::new()))
        .build();

    manager.add(worker("fast", Duration::from_millis(50)), Duration::from_millis(200));
    manager.add(worker("slow", Duration::from_millis(900)), Duration::from_millis(500));

    let runs = Arc::new(AtomicU32::new(0));
    manager.add(
        TaskFn::arc("flaky", move || {
            let runs = runs.clone();
            async move {
                if runs.fetch_add(1, Ordering::SeqCst) % 2 == 1 {
                    return Err(TaskError::fail("upstream unavailable"));
                }
                Ok(())
            }
        }),
        Duration::from_millis(700),
    );

    let closing = tokio::select! {
        res = manager.close_on_signal() => res?,
        _ = tokio::time::sleep(Duration::from_secs(3)) => manager.close(),
    };

    match closing.await {
        Ok(()) => println!("closed cleanly"),
        Err(e) => println!("close failed: {} ({})", e, e.as_message()),
    }

    // Let the subscriber worker print the tail of the event stream.
    tokio::time::sleep(Duration::from_millis(50)).await;
    Ok(())
}
