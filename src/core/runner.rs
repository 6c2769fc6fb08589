//! # Run a single execution of a task.
//!
//! Executes one firing of a [`Task`] and publishes its terminal event to the [`Bus`].
//!
//! ## Event flow
//! ```text
//! Success:
//!   task.spawn() → Ok(())  → publish TaskStopped → drop guard
//!
//! Failure:
//!   task.spawn() → Err(e)  → publish TaskFailed  → drop guard
//!
//! Panic:
//!   task.spawn() panics    → unwind drops guard  → tokio reports the panic
//! ```
//!
//! ## Rules
//! - The in-flight guard is released **after** the terminal event, on every path
//! - Errors are reported, never retried or swallowed
//! - Panics are not caught here

use crate::{
    core::in_flight::InFlightGuard,
    error::TaskError,
    events::{Bus, Event, EventKind},
    tasks::Task,
};

/// Executes one firing of `task` while holding its in-flight `guard`.
pub async fn run_once<T: Task + ?Sized>(task: &T, bus: &Bus, guard: InFlightGuard) {
    match task.spawn().await {
        Ok(()) => publish_stopped(bus, task.name()),
        Err(e) => publish_failed(bus, task.name(), &e),
    }
    drop(guard);
}

/// Publishes `TaskStopped` event.
fn publish_stopped(bus: &Bus, name: &str) {
    bus.publish(Event::new(EventKind::TaskStopped).with_task(name));
}

/// Publishes `TaskFailed` event with error details.
fn publish_failed(bus: &Bus, name: &str, err: &TaskError) {
    bus.publish(
        Event::new(EventKind::TaskFailed)
            .with_task(name)
            .with_reason(err.to_string()),
    );
}
