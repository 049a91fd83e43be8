//! Graceful shutdown and signal handling.

use std::future::Future;
use std::time::Duration;

/// Resolves when SIGTERM or SIGINT is received.
///
/// When passed to `axum::serve(..).with_graceful_shutdown`, the server stops
/// accepting new connections and waits for in-flight requests to finish.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

/// Run `serve` until it finishes on its own or `grace` elapses after `signal` fires.
///
/// `serve` is expected to begin draining when `signal` resolves; this bounds
/// how long the drain may take.
pub(crate) async fn drain_with_deadline<S, F, T>(serve: S, signal: F, grace: Duration) -> Option<T>
where
    S: Future<Output = T>,
    F: Future<Output = ()>,
{
    tokio::pin!(serve);
    tokio::select! {
        out = &mut serve => return Some(out),
        _ = signal => {}
    }

    tracing::info!(
        grace_secs = grace.as_secs(),
        "Graceful shutdown initiated, waiting for connections to close"
    );
    match tokio::time::timeout(grace, serve).await {
        Ok(out) => Some(out),
        Err(_) => {
            tracing::warn!("Connections still open after grace period, exiting");
            None
        }
    }
}
