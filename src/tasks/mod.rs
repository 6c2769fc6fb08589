//! # Task abstractions.
//!
//! - [`Task`] - trait for periodic units of async work
//! - [`TaskFn`] - closure-backed task implementation
//! - [`TaskRef`] - shared reference to a task (`Arc<dyn Task>`)

mod task;
mod task_fn;

pub use task::{BoxTaskFuture, Task, TaskRef};
pub use task_fn::TaskFn;
