//! # Close handle: one race, one result, many awaiters.
//!
//! The first `close()` builds a [`CloseHandle`] that races two signals:
//!
//! ```text
//!   InFlight::on_value_equals_zero ──► oneshot ──┐
//!                                                ├──► select! ──► Shared result
//!   sleep_until(deadline) ───────────────────────┘
//! ```
//!
//! - zero first → `Ok(())`, the sleep is dropped, `AllStoppedWithin` published
//! - deadline first → `Err(CloseError::Timeout)`, `CloseTimeout` published; a
//!   later zero notification lands on a dropped receiver and is ignored
//!
//! The race is spawned right away, so the outcome is decided even if the handle
//! is never awaited. Clones share the same result.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::oneshot;
use tokio::time::{self, Instant};

use crate::{
    core::in_flight::InFlight,
    error::CloseError,
    events::{Bus, Event, EventKind},
};

/// Shared completion of a close sequence.
///
/// Resolves to `Ok(())` once in-flight executions drained, or to
/// [`CloseError::Timeout`] when the close timeout elapsed first.
#[derive(Clone)]
pub struct CloseHandle {
    inner: Shared<BoxFuture<'static, Result<(), CloseError>>>,
}

impl CloseHandle {
    /// Spawns the race between `zero` and a deadline `timeout` from now.
    pub(crate) fn spawn(
        zero: oneshot::Receiver<()>,
        timeout: Duration,
        in_flight: Arc<InFlight>,
        bus: Bus,
    ) -> Self {
        let deadline = deadline_after(timeout);
        let race = async move {
            tokio::select! {
                biased;
                Ok(()) = zero => {
                    bus.publish(Event::new(EventKind::AllStoppedWithin));
                    Ok(())
                }
                _ = time::sleep_until(deadline) => {
                    bus.publish(
                        Event::new(EventKind::CloseTimeout)
                            .with_in_flight(in_flight.value())
                            .with_timeout(timeout),
                    );
                    Err(CloseError::Timeout { timeout })
                }
            }
        };

        let inner = race.boxed().shared();
        tokio::spawn(inner.clone());
        Self { inner }
    }

    /// Returns true if both handles belong to the same close sequence.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Shared::ptr_eq(&self.inner, &other.inner)
    }

    /// Returns the outcome if the race has already been decided.
    pub fn peek(&self) -> Option<Result<(), CloseError>> {
        self.inner.peek().cloned()
    }
}

/// `now + timeout`, saturated to roughly thirty years out when that overflows.
fn deadline_after(timeout: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(timeout)
        .unwrap_or_else(|| now + Duration::from_secs(86_400 * 365 * 30))
}

impl Future for CloseHandle {
    type Output = Result<(), CloseError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.poll_unpin(cx)
    }
}

impl std::fmt::Debug for CloseHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloseHandle")
            .field("outcome", &self.peek())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn race(zero: oneshot::Receiver<()>, timeout: Duration) -> CloseHandle {
        CloseHandle::spawn(zero, timeout, Arc::new(InFlight::new()), Bus::new(4))
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_signal_wins() {
        let (tx, rx) = oneshot::channel();
        let handle = race(rx, Duration::from_secs(1));

        time::sleep(Duration::from_millis(10)).await;
        assert!(handle.peek().is_none());

        let _ = tx.send(());
        assert_eq!(handle.clone().await, Ok(()));
        assert_eq!(handle.peek(), Some(Ok(())));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_wins_and_late_zero_is_inert() {
        let (tx, rx) = oneshot::channel();
        let start = Instant::now();
        let handle = race(rx, Duration::from_millis(500));

        let res = handle.clone().await;
        assert_eq!(
            res,
            Err(CloseError::Timeout {
                timeout: Duration::from_millis(500)
            })
        );
        let waited = start.elapsed();
        assert!(waited >= Duration::from_millis(500) && waited < Duration::from_millis(510));

        assert!(tx.send(()).is_err());
        assert_eq!(handle.await, res);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unbounded_timeout_saturates() {
        let (tx, rx) = oneshot::channel();
        let handle = race(rx, Duration::MAX);

        time::sleep(Duration::from_secs(86_400)).await;
        assert!(handle.peek().is_none());

        let _ = tx.send(());
        assert_eq!(handle.await, Ok(()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_decided_without_awaiting() {
        let (_tx, rx) = oneshot::channel();
        let handle = race(rx, Duration::from_millis(50));

        time::sleep(Duration::from_millis(60)).await;
        assert!(matches!(handle.peek(), Some(Err(CloseError::Timeout { .. }))));
    }

    #[tokio::test]
    async fn test_clones_share_identity() {
        let (_tx, rx) = oneshot::channel();
        let a = race(rx, Duration::from_secs(5));
        let (_tx2, rx2) = oneshot::channel();
        let b = race(rx2, Duration::from_secs(5));

        assert!(a.ptr_eq(&a.clone()));
        assert!(!a.ptr_eq(&b));
    }
}
