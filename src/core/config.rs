//! # Manager configuration.
//!
//! Provides [`Config`] centralized settings for a [`TaskManager`](crate::TaskManager).
//!
//! ## Sentinel values
//! - `bus_capacity = 0` → clamped to 1 by [`Config::bus_capacity_clamped`]
//! - `close_timeout = 0s` → `close()` succeeds only if nothing is in flight when it is called

use std::time::Duration;

/// Configuration for a task manager.
///
/// ## Field semantics
/// - `close_timeout`: Maximum wait for in-flight executions to drain after `close()`
/// - `bus_capacity`: Event bus ring buffer size (min 1; clamped by Bus)
///
/// ## Notes
/// All fields are public for flexibility. Prefer the helper accessors to avoid
/// sprinkling sentinel checks across the codebase.
#[derive(Clone, Debug)]
pub struct Config {
    /// Maximum time `close()` waits for in-flight executions.
    ///
    /// When exceeded, the close handle resolves to
    /// [`CloseError::Timeout`](crate::CloseError::Timeout). Running executions
    /// are not interrupted.
    pub close_timeout: Duration,

    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Slow subscribers that lag behind more than `bus_capacity` messages will
    /// receive `Lagged` and skip older items. Minimum value is 1 (enforced by Bus).
    pub bus_capacity: usize,
}

impl Config {
    /// Returns a config with the given close timeout and default everything else.
    #[inline]
    pub fn with_close_timeout(close_timeout: Duration) -> Self {
        Self {
            close_timeout,
            ..Self::default()
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `close_timeout = 60s`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            close_timeout: Duration::from_millis(60_000),
            bus_capacity: 1024,
        }
    }
}
