//! # OS termination signals.
//!
//! [`wait_for_shutdown_signal`] completes when the process is asked to stop. It
//! backs [`TaskManager::close_on_signal`](crate::TaskManager::close_on_signal),
//! which turns the signal into a graceful close.
//!
//! - **Unix**: `SIGINT`, `SIGTERM`, `SIGQUIT`
//! - **Elsewhere**: Ctrl-C via [`tokio::signal::ctrl_c`]

/// Waits for a termination signal.
///
/// Each call registers its own listeners. Returns `Err` if registration fails.
#[cfg(unix)]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigquit = signal(SignalKind::quit())?;

    tokio::select! {
        _ = sigint.recv()  => {},
        _ = sigterm.recv() => {},
        _ = sigquit.recv() => {},
    }
    Ok(())
}

/// Waits for a termination signal.
///
/// Each call registers its own listeners. Returns `Err` if registration fails.
#[cfg(not(unix))]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}
