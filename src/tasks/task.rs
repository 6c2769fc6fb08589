//! # Task abstraction.
//!
//! This module defines the [`Task`] trait: the unit of work a timer runs on every
//! firing. The common handle type is [`TaskRef`], an `Arc<dyn Task>` suitable for
//! sharing between the manager and its timers.
//!
//! A task is not cancelled by the manager. Once an execution has started it runs
//! to completion, even after `close()` has given up waiting for it.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::TaskError;

/// Boxed future returned by [`Task::spawn`].
pub type BoxTaskFuture = Pin<Box<dyn Future<Output = Result<(), TaskError>> + Send + 'static>>;

/// Shared handle to a task.
pub type TaskRef = Arc<dyn Task>;

/// # Asynchronous unit of periodic work.
///
/// A `Task` has a stable [`name`](Task::name) and produces a **fresh** future per
/// firing via [`spawn`](Task::spawn). Firings of the same task may overlap if one
/// execution outlives the period.
///
/// # Example
/// ```
/// use tickvisor::{BoxTaskFuture, Task};
///
/// struct Flush;
///
/// impl Task for Flush {
///     fn name(&self) -> &str { "flush" }
///
///     fn spawn(&self) -> BoxTaskFuture {
///         Box::pin(async {
///             // write buffered data...
///             Ok(())
///         })
///     }
/// }
/// ```
pub trait Task: Send + Sync + 'static {
    /// Returns a stable, human-readable task name.
    fn name(&self) -> &str;

    /// Creates the future for one execution.
    fn spawn(&self) -> BoxTaskFuture;
}
