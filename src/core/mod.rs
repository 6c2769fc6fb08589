//! Runtime core: counting, timers and the close sequence.
//!
//! The public API from this module is [`TaskManager`] (with its builder and
//! [`CloseHandle`]), [`Config`], the [`InFlight`] counter and the period rules.
//!
//! Internal modules:
//! - [`in_flight`]: counter of running executions with a zero-crossing handler;
//! - [`timer`]: repeating timers on tokio, period normalization;
//! - [`runner`]: runs one execution and publishes its terminal event;
//! - [`close`]: the zero-or-timeout race behind [`CloseHandle`];
//! - [`manager`]: `add`/`close` and the `Open → Closing` state machine;
//! - [`shutdown`]: cross-platform shutdown signal handling.

mod builder;
mod close;
mod config;
mod in_flight;
mod manager;
mod runner;
mod shutdown;
mod timer;

pub use builder::TaskManagerBuilder;
pub use close::CloseHandle;
pub use config::Config;
pub use in_flight::{InFlight, InFlightGuard};
pub use manager::TaskManager;
pub use timer::{MAX_PERIOD_MS, TimerHandle, normalize_period, schedule_repeating};
