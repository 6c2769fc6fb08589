//! # tickvisor
//!
//! **Tickvisor** runs recurring async tasks on tokio and shuts them down
//! gracefully: on close it stops starting new executions, lets the running
//! ones finish, and bounds the wait with a timeout.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │ TaskRef #1   │   │ TaskRef #2   │   │ TaskRef #3   │
//!     │ every 100ms  │   │ every 1s     │   │ every 5s     │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼ add()            ▼ add()            ▼ add()
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  TaskManager                                                      │
//! │  - state: Open | Closing(CloseHandle)                             │
//! │  - timers: one repeating timer per task                           │
//! │  - InFlight: running executions + zero-crossing handler           │
//! │  - Bus: broadcast events to subscribers                           │
//! └──────┬──────────────────┬──────────────────┬──────────────────────┘
//!        ▼ tick             ▼ tick             ▼ tick
//!   ┌──────────┐       ┌──────────┐       ┌──────────┐
//!   │execution │       │execution │       │execution │   (one tokio task each,
//!   │ + guard  │       │ + guard  │       │ + guard  │    counted while running)
//!   └──────────┘       └──────────┘       └──────────┘
//! ```
//!
//! ### Close sequence
//! ```text
//! close() ──► state = Closing ──► cancel timers ──► race:
//!               ├─ InFlight reaches zero  ─► Ok(())            (AllStoppedWithin)
//!               └─ close_timeout elapses  ─► Err(Timeout)      (CloseTimeout)
//! close() again ──► same CloseHandle
//! ```
//!
//! ## Features
//! | Area              | Description                                               | Key types / traits                        |
//! |-------------------|-----------------------------------------------------------|-------------------------------------------|
//! | **Scheduling**    | Register periodic tasks, close them gracefully.           | [`TaskManager`], [`CloseHandle`]          |
//! | **Counting**      | In-flight counter with zero-crossing notification.        | [`InFlight`], [`InFlightGuard`]           |
//! | **Tasks**         | Define tasks as closures or trait impls.                  | [`Task`], [`TaskFn`], [`TaskRef`]         |
//! | **Events**        | Observe registration, executions and the close sequence.  | [`Event`], [`EventKind`], [`Subscribe`]   |
//! | **Errors**        | Typed errors for close and task execution.                | [`CloseError`], [`TaskError`]             |
//! | **Configuration** | Close timeout and bus capacity.                           | [`Config`]                                |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use tickvisor::{Config, TaskError, TaskFn, TaskManager, TaskRef};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let manager = TaskManager::new(Config::with_close_timeout(Duration::from_secs(5)));
//!
//!     let flush: TaskRef = TaskFn::arc("flush", || async {
//!         tokio::time::sleep(Duration::from_millis(30)).await;
//!         Ok::<_, TaskError>(())
//!     });
//!     manager.add(flush, Duration::from_millis(100));
//!
//!     tokio::time::sleep(Duration::from_millis(250)).await;
//!
//!     // Typically called from a shutdown hook; repeated calls share one result.
//!     manager.close().await?;
//!     Ok(())
//! }
//! ```

mod core;
mod error;
mod events;
mod subscribers;
mod tasks;

// ---- Public re-exports ----

pub use crate::core::{
    CloseHandle, Config, InFlight, InFlightGuard, MAX_PERIOD_MS, TaskManager, TaskManagerBuilder,
    TimerHandle, normalize_period, schedule_repeating,
};
pub use error::{CloseError, TaskError};
pub use events::{Bus, Event, EventKind};
pub use subscribers::{Subscribe, SubscriberSet};
pub use tasks::{BoxTaskFuture, Task, TaskFn, TaskRef};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
