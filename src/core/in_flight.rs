//! # In-flight execution counter with a zero-crossing notification.
//!
//! [`InFlight`] counts executions that are currently running and calls a
//! registered handler whenever the count is observed at zero.
//!
//! ## Rules
//! - `increase`/`decrease` and the zero check run in one critical section
//! - the handler runs **after** the lock is released (it may touch the counter)
//! - `decrease` leaving zero fires the handler, every time; no deduplication
//! - `on_value_equals_zero` replaces the handler and fires it at once if the
//!   count is already zero
//!
//! ```text
//! enter() ──► increase()            value: 0 → 1
//!   ...       (execution runs)
//! drop(guard) ──► decrease()        value: 1 → 0 ──► handler()
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Zero-crossing handler.
pub type ZeroHandler = Arc<dyn Fn() + Send + Sync + 'static>;

struct State {
    value: usize,
    on_zero: Option<ZeroHandler>,
}

/// Thread-safe counter of in-flight executions.
pub struct InFlight {
    state: Mutex<State>,
}

impl InFlight {
    /// Creates a counter at zero with no handler.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                value: 0,
                on_zero: None,
            }),
        }
    }

    /// Adds one execution.
    pub fn increase(&self) {
        self.lock().value += 1;
    }

    /// Removes one execution and notifies the handler if the count is now zero.
    ///
    /// Calling this on a zero counter is a caller bug: debug builds panic, release
    /// builds leave the count at zero without notifying.
    pub fn decrease(&self) {
        let handler = {
            let mut st = self.lock();
            debug_assert!(st.value > 0, "in-flight counter decreased below zero");
            if st.value == 0 {
                return;
            }
            st.value -= 1;
            if st.value == 0 { st.on_zero.clone() } else { None }
        };
        if let Some(h) = handler {
            h();
        }
    }

    /// Registers `handler`, replacing the previous one, and fires it right away
    /// if nothing is in flight.
    pub fn on_value_equals_zero<F>(&self, handler: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        let handler: ZeroHandler = Arc::new(handler);
        let fire_now = {
            let mut st = self.lock();
            st.on_zero = Some(Arc::clone(&handler));
            st.value == 0
        };
        if fire_now {
            handler();
        }
    }

    /// Increases the count and returns a guard that decreases it on drop.
    ///
    /// The guard also runs during unwinding, so a panicking execution is still uncounted.
    #[must_use = "dropping the guard immediately ends the execution"]
    pub fn enter(self: &Arc<Self>) -> InFlightGuard {
        self.increase();
        InFlightGuard {
            counter: Arc::clone(self),
        }
    }

    /// Current number of in-flight executions.
    pub fn value(&self) -> usize {
        self.lock().value
    }

    // The protected data is a plain integer and an Arc, both always valid.
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for InFlight {
    fn default() -> Self {
        Self::new()
    }
}

/// Scoped registration of one in-flight execution.
pub struct InFlightGuard {
    counter: Arc<InFlight>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.counter.decrease();
    }
}
