//! # TaskManager: periodic tasks with a bounded graceful close.
//!
//! The [`TaskManager`] owns the repeating timers, one [`InFlight`] counter and an
//! `Open → Closing` state machine. It exposes two operations:
//!
//! - [`add`](TaskManager::add) registers a task on its own repeating timer
//! - [`close`](TaskManager::close) stops admitting executions and waits, up to
//!   [`Config::close_timeout`], for the running ones to finish
//!
//! ## Architecture
//! ```text
//! add(task, period)
//!   └─► timer::schedule_repeating(period, on_tick)
//!         on_tick:
//!           ├─ lock state ── Closing? ──► stop the timer
//!           ├─ in_flight.enter()            (still under the state lock)
//!           ├─ publish TaskStarting
//!           └─ tokio::spawn(run_once(task, guard))
//!                 └─ guard dropped ──► in_flight.decrease() ──► zero handler?
//!
//! close()
//!   ├─ lock state ── Closing(handle)? ──► return handle.clone()
//!   ├─ state = Closing, cancel every timer, publish CloseRequested
//!   ├─ CloseHandle::spawn(zero_rx, close_timeout)
//!   └─ in_flight.on_value_equals_zero(send zero_tx once)
//! ```
//!
//! ## Rules
//! - Admission and `increase()` happen under the state lock, so no execution
//!   starts after `close()` flipped the state
//! - Executions are never cancelled; a timed-out close leaves them running
//! - `add` after `close` is a silent no-op (publishes `TaskRejected`)
//! - `close` is idempotent and returns clones of one [`CloseHandle`]
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use tickvisor::{Config, TaskError, TaskFn, TaskManager};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let manager = TaskManager::new(Config::with_close_timeout(Duration::from_secs(5)));
//!
//!     manager.add(
//!         TaskFn::arc("heartbeat", || async {
//!             tokio::time::sleep(Duration::from_millis(20)).await;
//!             Ok::<_, TaskError>(())
//!         }),
//!         Duration::from_millis(50),
//!     );
//!
//!     tokio::time::sleep(Duration::from_millis(120)).await;
//!     manager.close().await?;
//!     Ok(())
//! }
//! ```

use std::ops::ControlFlow;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::{broadcast, oneshot};
use tokio_util::sync::CancellationToken;

use crate::{
    core::{
        builder::TaskManagerBuilder,
        close::CloseHandle,
        config::Config,
        in_flight::InFlight,
        runner::run_once,
        shutdown,
        timer::{self, TimerHandle},
    },
    events::{Bus, Event, EventKind},
    tasks::TaskRef,
};

/// Admission state.
enum State {
    Open,
    Closing(CloseHandle),
}

/// State shared with the timer loops.
struct Inner {
    state: State,
    timers: Vec<TimerHandle>,
}

/// Runs periodic tasks and closes them down gracefully.
pub struct TaskManager {
    cfg: Config,
    bus: Bus,
    in_flight: Arc<InFlight>,
    inner: Arc<Mutex<Inner>>,
    /// Stops the subscriber listener when the manager is dropped.
    runtime_token: CancellationToken,
}

impl TaskManager {
    /// Creates a manager without subscribers.
    ///
    /// Does not need a runtime; `add` and `close` do.
    pub fn new(cfg: Config) -> Self {
        TaskManagerBuilder::new(cfg).build()
    }

    /// Returns a builder for attaching event subscribers.
    pub fn builder(cfg: Config) -> TaskManagerBuilder {
        TaskManagerBuilder::new(cfg)
    }

    pub(crate) fn new_internal(cfg: Config, bus: Bus, runtime_token: CancellationToken) -> Self {
        Self {
            cfg,
            bus,
            in_flight: Arc::new(InFlight::new()),
            inner: Arc::new(Mutex::new(Inner {
                state: State::Open,
                timers: Vec::new(),
            })),
            runtime_token,
        }
    }

    /// Registers `task` to run every `period`.
    ///
    /// The period is normalized (see [`normalize_period`](crate::normalize_period)).
    /// The first execution starts one period from now. Executions of the same task
    /// may overlap. Does nothing once [`close`](Self::close) has been called.
    ///
    /// Must be called from within a tokio runtime.
    pub fn add(&self, task: TaskRef, period: Duration) {
        let mut inner = lock(&self.inner);
        if matches!(inner.state, State::Closing(_)) {
            drop(inner);
            self.bus
                .publish(Event::new(EventKind::TaskRejected).with_task(task.name()));
            return;
        }

        let name = task.name().to_string();
        let on_tick = {
            let gate = Arc::clone(&self.inner);
            let in_flight = Arc::clone(&self.in_flight);
            let bus = self.bus.clone();

            move || {
                let guard = {
                    let inner = lock(&gate);
                    if matches!(inner.state, State::Closing(_)) {
                        return ControlFlow::Break(());
                    }
                    in_flight.enter()
                };
                bus.publish(
                    Event::new(EventKind::TaskStarting)
                        .with_task(task.name())
                        .with_in_flight(in_flight.value()),
                );

                let task = Arc::clone(&task);
                let bus = bus.clone();
                tokio::spawn(async move { run_once(task.as_ref(), &bus, guard).await });
                ControlFlow::Continue(())
            }
        };

        let handle = timer::schedule_repeating(period, on_tick);
        let period = handle.period();
        inner.timers.push(handle);
        drop(inner);

        self.bus.publish(
            Event::new(EventKind::TaskAdded)
                .with_task(name)
                .with_period(period),
        );
    }

    /// Stops scheduling and waits for in-flight executions.
    ///
    /// The first call cancels every timer and starts the close timeout; later
    /// calls return a clone of the same [`CloseHandle`] without restarting it.
    /// The handle resolves to `Ok(())` once nothing is in flight, or to
    /// [`CloseError::Timeout`](crate::CloseError::Timeout) when the timeout
    /// elapses first. Timed-out executions keep running.
    ///
    /// Must be called from within a tokio runtime.
    pub fn close(&self) -> CloseHandle {
        let (handle, zero_tx) = {
            let mut inner = lock(&self.inner);
            if let State::Closing(handle) = &inner.state {
                return handle.clone();
            }

            for t in inner.timers.drain(..) {
                t.cancel();
            }
            self.bus.publish(
                Event::new(EventKind::CloseRequested)
                    .with_in_flight(self.in_flight.value())
                    .with_timeout(self.cfg.close_timeout),
            );

            let (zero_tx, zero_rx) = oneshot::channel();
            let handle = CloseHandle::spawn(
                zero_rx,
                self.cfg.close_timeout,
                Arc::clone(&self.in_flight),
                self.bus.clone(),
            );
            inner.state = State::Closing(handle.clone());
            (handle, zero_tx)
        };

        let zero_tx = Mutex::new(Some(zero_tx));
        self.in_flight.on_value_equals_zero(move || {
            let tx = zero_tx.lock().unwrap_or_else(PoisonError::into_inner).take();
            if let Some(tx) = tx {
                let _ = tx.send(());
            }
        });
        handle
    }

    /// Waits for SIGINT/SIGTERM/SIGQUIT (Ctrl-C off Unix), then calls [`close`](Self::close).
    ///
    /// Returns `Err` if signal registration fails; the manager is left open then.
    pub async fn close_on_signal(&self) -> std::io::Result<CloseHandle> {
        shutdown::wait_for_shutdown_signal().await?;
        Ok(self.close())
    }

    /// Returns true once [`close`](Self::close) has been called.
    pub fn is_closing(&self) -> bool {
        matches!(lock(&self.inner).state, State::Closing(_))
    }

    /// Number of executions currently running.
    pub fn in_flight(&self) -> usize {
        self.in_flight.value()
    }

    /// Number of active timers (zero after `close`).
    pub fn len(&self) -> usize {
        lock(&self.inner).timers.len()
    }

    /// Returns true if no timer is active.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw receiver of runtime events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// Configuration the manager was built with.
    pub fn config(&self) -> &Config {
        &self.cfg
    }
}

impl Drop for TaskManager {
    /// Cancels the remaining timers and stops the subscriber listener.
    /// Running executions are left alone.
    fn drop(&mut self) {
        for t in lock(&self.inner).timers.drain(..) {
            t.cancel();
        }
        self.runtime_token.cancel();
    }
}

// A panic while holding the lock cannot leave `Inner` half-updated.
fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CloseError, TaskError};
    use crate::tasks::TaskFn;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time;

    fn counting(name: &'static str, work: Duration) -> (TaskRef, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let c = calls.clone();
        let task = TaskFn::arc(name, move || {
            let c = c.clone();
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                time::sleep(work).await;
                Ok::<_, TaskError>(())
            }
        });
        (task, calls)
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_with_nothing_added_resolves_immediately() {
        let manager = TaskManager::new(Config::default());
        let start = time::Instant::now();

        assert_eq!(manager.close().await, Ok(()));
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_twice_returns_same_handle() {
        let manager = TaskManager::new(Config::with_close_timeout(Duration::from_millis(1_000)));
        let (task, _) = counting("slow", Duration::from_millis(300));
        manager.add(task, Duration::from_millis(100));
        time::sleep(Duration::from_millis(105)).await;

        let first = manager.close();
        time::sleep(Duration::from_millis(50)).await;
        let second = manager.close();

        assert!(first.ptr_eq(&second));
        assert!(manager.is_closing());
        assert_eq!(second.await, Ok(()));
        assert_eq!(first.peek(), Some(Ok(())));
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_cancels_timers() {
        let manager = TaskManager::new(Config::default());
        let (task, calls) = counting("tick", Duration::ZERO);
        manager.add(task, Duration::from_millis(10));
        assert_eq!(manager.len(), 1);

        time::sleep(Duration::from_millis(35)).await;
        assert_eq!(manager.close().await, Ok(()));
        assert!(manager.is_empty());

        let seen = calls.load(Ordering::SeqCst);
        assert_eq!(seen, 3);
        time::sleep(Duration::from_millis(100)).await;
        assert_eq!(calls.load(Ordering::SeqCst), seen);
    }

    #[tokio::test(start_paused = true)]
    async fn test_add_after_close_is_ignored() {
        let manager = TaskManager::new(Config::default());
        let mut events = manager.subscribe();
        let _ = manager.close();

        let (task, calls) = counting("late", Duration::ZERO);
        manager.add(task, Duration::from_millis(10));
        time::sleep(Duration::from_millis(100)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(manager.is_empty());

        let mut kinds = Vec::new();
        while let Ok(ev) = events.try_recv() {
            kinds.push(ev.kind);
        }
        assert!(kinds.contains(&EventKind::TaskRejected));
        assert!(!kinds.contains(&EventKind::TaskAdded));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_leaves_execution_running() {
        let manager = TaskManager::new(Config::with_close_timeout(Duration::from_millis(100)));
        let (task, calls) = counting("stuck", Duration::from_millis(500));
        manager.add(task, Duration::from_millis(10));
        time::sleep(Duration::from_millis(15)).await;
        assert_eq!(manager.in_flight(), 1);

        let res = manager.close().await;
        assert_eq!(
            res,
            Err(CloseError::Timeout {
                timeout: Duration::from_millis(100)
            })
        );
        assert_eq!(manager.in_flight(), 1);

        time::sleep(Duration::from_millis(500)).await;
        assert_eq!(manager.in_flight(), 0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unbounded_close_timeout_still_closes() {
        let manager = TaskManager::new(Config::with_close_timeout(Duration::MAX));
        let (task, _) = counting("work", Duration::from_millis(50));
        manager.add(task, Duration::from_millis(10));
        time::sleep(Duration::from_millis(15)).await;

        let handle = manager.close();
        assert!(manager.is_closing());

        let (late, late_calls) = counting("late", Duration::ZERO);
        manager.add(late, Duration::from_millis(10));
        assert!(manager.is_empty());

        assert_eq!(handle.await, Ok(()));
        time::sleep(Duration::from_millis(100)).await;
        assert_eq!(late_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stays_open_until_signal() {
        let manager = TaskManager::new(Config::default());
        let (task, calls) = counting("tick", Duration::ZERO);
        manager.add(task, Duration::from_millis(10));

        let signalled = tokio::select! {
            res = manager.close_on_signal() => Some(res),
            _ = time::sleep(Duration::from_millis(55)) => None,
        };
        assert!(signalled.is_none());
        assert!(!manager.is_closing());
        assert_eq!(manager.len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 5);

        assert_eq!(manager.close().await, Ok(()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_task_is_reported_and_uncounted() {
        let manager = TaskManager::new(Config::default());
        let mut events = manager.subscribe();
        manager.add(
            TaskFn::arc("broken", || async { Err::<(), _>(TaskError::fail("boom")) }),
            Duration::from_millis(10),
        );

        time::sleep(Duration::from_millis(15)).await;
        assert_eq!(manager.in_flight(), 0);
        assert_eq!(manager.close().await, Ok(()));

        let mut failed = None;
        while let Ok(ev) = events.try_recv() {
            if ev.kind == EventKind::TaskFailed {
                failed = ev.reason.map(|r| r.to_string());
            }
        }
        assert_eq!(failed.as_deref(), Some("execution failed: boom"));
    }
}
