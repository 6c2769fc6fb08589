//! # LogWriter: simple event printer
//!
//! A minimal subscriber that prints incoming [`Event`]s to stdout.
//! Use it for test or demo.
//!
//! ## Example output
//! ```text
//! [added] task="flush" period_ms=100
//! [starting] task="flush" in_flight=1
//! [failed] task="flush" err="execution failed: disk full"
//! [stopped] task="flush"
//! [rejected] task="late"
//! [close-requested] in_flight=2 timeout_ms=60000
//! [all-stopped-within-timeout]
//! [close-timeout] in_flight=1 timeout_ms=1000
//! ```

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;
use async_trait::async_trait;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::TaskAdded => {
                println!("[added] task={:?} period_ms={:?}", e.task, e.period_ms);
            }
            EventKind::TaskRejected => {
                println!("[rejected] task={:?}", e.task);
            }
            EventKind::TaskStarting => {
                println!("[starting] task={:?} in_flight={:?}", e.task, e.in_flight);
            }
            EventKind::TaskStopped => {
                println!("[stopped] task={:?}", e.task);
            }
            EventKind::TaskFailed => {
                println!("[failed] task={:?} err={:?}", e.task, e.reason);
            }
            EventKind::CloseRequested => {
                println!(
                    "[close-requested] in_flight={:?} timeout_ms={:?}",
                    e.in_flight, e.timeout_ms
                );
            }
            EventKind::AllStoppedWithin => {
                println!("[all-stopped-within-timeout]");
            }
            EventKind::CloseTimeout => {
                println!(
                    "[close-timeout] in_flight={:?} timeout_ms={:?}",
                    e.in_flight, e.timeout_ms
                );
            }
            EventKind::SubscriberOverflow => {
                println!(
                    "[subscriber-overflow] subscriber={:?} reason={:?}",
                    e.task, e.reason
                );
            }
            EventKind::SubscriberPanicked => {
                println!(
                    "[subscriber-panicked] subscriber={} info={}",
                    e.task.as_deref().unwrap_or("unknown"),
                    e.reason.as_deref().unwrap_or("unknown"),
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
