//! HTTP server lifecycle: starts/stops the axum server for the app router.
//!
//! bind → spawn background task → return handle with shutdown channel.

use std::net::SocketAddr;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::api::router::app_router;
use crate::api::types::ApiContext;

// ═══════════════════════════════════════════════════════════
// Public types
// ═══════════════════════════════════════════════════════════

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind server on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },
    #[error("Failed to get server address: {0}")]
    LocalAddr(std::io::Error),
}

/// Metadata for a running server.
#[derive(Debug, Clone)]
pub struct ServerInfo {
    pub server_addr: SocketAddr,
}

/// Handle to a running server.
pub struct AppServer {
    pub info: ServerInfo,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl AppServer {
    pub fn addr(&self) -> SocketAddr {
        self.info.server_addr
    }

    /// Send the graceful-shutdown signal. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("Server shutdown signal sent");
        }
    }

    /// Wait for the server task to finish.
    pub async fn wait(self) {
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Server task ended abnormally");
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Server lifecycle
// ═══════════════════════════════════════════════════════════

/// Bind `addr`, mount `app_router`, and serve it on a background task.
///
/// Port 0 picks an ephemeral port; the bound address is in the handle.
pub async fn start_server(ctx: ApiContext, addr: SocketAddr) -> Result<AppServer, ServerError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    let addr = listener.local_addr().map_err(ServerError::LocalAddr)?;

    let app = app_router(ctx);

    let info = ServerInfo { server_addr: addr };

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("Server received shutdown signal");
        };

        tracing::info!(%addr, "Server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("Server error: {e}");
        }

        tracing::info!("Server stopped");
    });

    Ok(AppServer {
        info,
        shutdown_tx: Some(shutdown_tx),
        task,
    })
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
