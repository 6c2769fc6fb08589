//! # Runtime events emitted by the task manager and its executions.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Registration events**: a periodic task was accepted or rejected
//! - **Execution events**: one firing of a task (starting, stopped, failed)
//! - **Close events**: the close sequence (requested, drained, timed out)
//!
//! The [`Event`] struct carries additional metadata such as timestamps, task name,
//! reasons, periods and in-flight counts.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use tickvisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::TaskAdded)
//!     .with_task("flush")
//!     .with_period(Duration::from_millis(250));
//!
//! assert_eq!(ev.kind, EventKind::TaskAdded);
//! assert_eq!(ev.task.as_deref(), Some("flush"));
//! assert_eq!(ev.period_ms, Some(250));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `task`: subscriber name
    /// - `reason`: panic info/message
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `task`: subscriber name
    /// - `reason`: reason string (e.g., "full", "closed")
    SubscriberOverflow,

    // === Registration events ===
    /// A periodic task was registered and its timer started.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `period_ms`: normalized period (ms)
    TaskAdded,

    /// `add` was called while the manager was closing; nothing was scheduled.
    ///
    /// Sets:
    /// - `task`: task name
    TaskRejected,

    // === Execution events ===
    /// A timer fired and an execution was admitted.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `in_flight`: count including this execution
    TaskStarting,

    /// An execution finished with `Ok(())`.
    ///
    /// Sets:
    /// - `task`: task name
    TaskStopped,

    /// An execution returned an error.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `reason`: failure message
    TaskFailed,

    // === Close events ===
    /// First `close()` call: timers cancelled, waiting for in-flight executions.
    ///
    /// Sets:
    /// - `in_flight`: executions still running at that instant
    /// - `timeout_ms`: configured close timeout (ms)
    CloseRequested,

    /// Every in-flight execution finished within the close timeout.
    AllStoppedWithin,

    /// The close timeout elapsed before in-flight executions drained.
    ///
    /// Sets:
    /// - `in_flight`: executions still running
    /// - `timeout_ms`: configured close timeout (ms)
    CloseTimeout,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Name of the task (or subscriber), if applicable.
    pub task: Option<Arc<str>>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
    /// Timer period in milliseconds (compact).
    pub period_ms: Option<u32>,
    /// Close timeout in milliseconds (compact).
    pub timeout_ms: Option<u32>,
    /// Number of executions in flight when the event was produced.
    pub in_flight: Option<usize>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            task: None,
            reason: None,
            period_ms: None,
            timeout_ms: None,
            in_flight: None,
        }
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a task name.
    #[inline]
    pub fn with_task(mut self, task: impl Into<Arc<str>>) -> Self {
        self.task = Some(task.into());
        self
    }

    /// Attaches a timer period (stored as milliseconds).
    #[inline]
    pub fn with_period(mut self, d: Duration) -> Self {
        self.period_ms = Some(compact_ms(d));
        self
    }

    /// Attaches a close timeout (stored as milliseconds).
    #[inline]
    pub fn with_timeout(mut self, d: Duration) -> Self {
        self.timeout_ms = Some(compact_ms(d));
        self
    }

    /// Attaches the current in-flight count.
    #[inline]
    pub fn with_in_flight(mut self, n: usize) -> Self {
        self.in_flight = Some(n);
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_task(subscriber)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_task(subscriber)
            .with_reason(info)
    }

    /// Returns true for [`EventKind::SubscriberOverflow`].
    #[inline]
    pub fn is_subscriber_overflow(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberOverflow)
    }

    /// Returns true for [`EventKind::SubscriberPanicked`].
    #[inline]
    pub fn is_subscriber_panic(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberPanicked)
    }
}

fn compact_ms(d: Duration) -> u32 {
    d.as_millis().min(u128::from(u32::MAX)) as u32
}
