//! Error types used by the tickvisor runtime and tasks.
//!
//! This module defines two enums:
//!
//! - [`CloseError`]: returned by a [`CloseHandle`](crate::CloseHandle) when the
//!   close sequence fails.
//! - [`TaskError`]: returned by individual task executions.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging/metrics.
//!
//! A callback that cannot be invoked is not representable: `add` takes a
//! [`TaskRef`](crate::TaskRef), so there is no runtime "invalid callback" error.

use std::time::Duration;
use thiserror::Error;

/// # Errors produced by the close sequence.
///
/// `Clone` because every holder of the shared close handle receives its own copy.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CloseError {
    /// In-flight executions did not drain within the configured close timeout.
    ///
    /// The executions are **not** cancelled; they keep running in the background.
    #[error("Timeout reached")]
    Timeout {
        /// The configured close timeout.
        timeout: Duration,
    },
}

impl CloseError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use tickvisor::CloseError;
    /// use std::time::Duration;
    ///
    /// let err = CloseError::Timeout { timeout: Duration::from_secs(1) };
    /// assert_eq!(err.as_label(), "close_timeout");
    /// assert_eq!(err.to_string(), "Timeout reached");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            CloseError::Timeout { .. } => "close_timeout",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            CloseError::Timeout { timeout } => {
                format!("in-flight executions did not drain within {timeout:?}")
            }
        }
    }
}

/// # Errors produced by task execution.
///
/// The manager never retries or swallows these; they are only reported as
/// [`EventKind::TaskFailed`](crate::EventKind::TaskFailed).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum TaskError {
    /// Task execution failed.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },
}

impl TaskError {
    /// Shorthand for [`TaskError::Fail`] from anything printable.
    ///
    /// # Example
    /// ```
    /// use tickvisor::TaskError;
    ///
    /// let err = TaskError::fail("connection refused");
    /// assert_eq!(err.to_string(), "execution failed: connection refused");
    /// ```
    pub fn fail(error: impl std::fmt::Display) -> Self {
        TaskError::Fail {
            error: error.to_string(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Fail { .. } => "task_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            TaskError::Fail { error } => format!("error: {error}"),
        }
    }
}
