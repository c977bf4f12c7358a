//! Graceful shutdown on SIGTERM/SIGINT.

use std::time::Duration;

use axum_server::Handle;

/// Which signal ended the process.
#[derive(Debug, Clone, Copy)]
enum ShutdownSignal {
    CtrlC,
    Terminate,
}

async fn wait_for_signal() -> ShutdownSignal {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => ShutdownSignal::CtrlC,
        _ = terminate => ShutdownSignal::Terminate,
    }
}

/// Stop accepting connections on the first signal, then give in-flight
/// appends up to `grace` to finish.
pub fn setup_shutdown_handler(handle: Handle, grace: Duration) {
    tokio::spawn(async move {
        let signal = wait_for_signal().await;
        tracing::info!(
            signal = ?signal,
            grace_secs = grace.as_secs(),
            "Initiating graceful shutdown"
        );
        handle.graceful_shutdown(Some(grace));
    });
}
