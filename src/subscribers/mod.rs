//! # Event subscribers for the tickvisor runtime.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out
//! and (behind the `logging` feature) the built-in [`LogWriter`].
//!
//! ## Architecture
//! ```text
//! Timer / Execution / TaskManager ── publish(Event) ──► Bus ──► listener
//!                                                                  │
//!                                                                  ▼
//!                                                            SubscriberSet
//!                                                        ┌────────┼────────┐
//!                                                        ▼        ▼        ▼
//!                                                    LogWriter  Metrics  Custom
//! ```

mod subscribe;
mod subscriber_set;

#[cfg(feature = "logging")]
mod embedded;

pub use subscribe::Subscribe;
pub use subscriber_set::SubscriberSet;

#[cfg(feature = "logging")]
pub use embedded::LogWriter;
