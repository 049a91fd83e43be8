//! HTTP server startup logic.

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use tokio::sync::watch;

use crate::config::{HttpServerConfig, SHUTDOWN_GRACE_SECS};

use super::shutdown::{self, drain_with_deadline};

/// Server startup error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind server: {0}")]
    Bind(#[source] std::io::Error),

    #[error("Invalid http.host or http.port: {0}")]
    Address(String),

    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Parse the listen address from configuration.
pub fn listen_addr(config: &HttpServerConfig) -> Result<SocketAddr, ServerError> {
    format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| ServerError::Address(format!("{}", e)))
}

/// Start the HTTP server.
///
/// This function blocks until the server shuts down after SIGTERM/SIGINT.
pub async fn start_server(app: Router, config: &HttpServerConfig) -> Result<(), ServerError> {
    let addr = listen_addr(config)?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(ServerError::Bind)?;

    tracing::info!(%addr, "Starting HTTP server");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown::shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });

    let serve = axum::serve(listener, app)
        .with_graceful_shutdown(stopped(shutdown_rx.clone()))
        .into_future();

    match drain_with_deadline(
        serve,
        stopped(shutdown_rx),
        Duration::from_secs(SHUTDOWN_GRACE_SECS),
    )
    .await
    {
        Some(result) => result.map_err(ServerError::Serve)?,
        None => return Ok(()),
    }

    tracing::info!("HTTP server stopped");
    Ok(())
}

async fn stopped(mut rx: watch::Receiver<bool>) {
    let _ = rx.wait_for(|stop| *stop).await;
}
