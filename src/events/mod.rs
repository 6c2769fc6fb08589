//! Runtime events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to runtime events emitted by the task manager, its timers
//! and the executions they spawn.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `TaskManager` (add/close), `timer` loops (executions),
//!   `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: the manager's event listener (fans out to `SubscriberSet`)
//!   and any receiver obtained from `TaskManager::subscribe`.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
