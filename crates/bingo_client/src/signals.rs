//! Signal handling for graceful client shutdown.
//!
//! This module provides cross-platform signal handling so the client can
//! close its connection cleanly when receiving termination signals.

use tokio::signal;

/// Completes when a shutdown signal is received.
///
/// # Platform Support
///
/// * **Unix platforms**: Handles SIGINT and SIGTERM signals
/// * **Windows**: Handles Ctrl+C signal
///
/// Signal-handler installation failures are treated as "no signal will ever
/// arrive" rather than an error: the future stays pending and the connection
/// loop keeps running.
pub async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use signal::unix::{signal, SignalKind};

        let sigint = signal(SignalKind::interrupt());
        let sigterm = signal(SignalKind::terminate());
        match (sigint, sigterm) {
            (Ok(mut sigint), Ok(mut sigterm)) => {
                tokio::select! {
                    _ = sigint.recv() => (),
                    _ = sigterm.recv() => ()
                }
            }
            _ => std::future::pending::<()>().await,
        }
    }

    #[cfg(windows)]
    {
        if signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
