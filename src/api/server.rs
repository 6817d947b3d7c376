//! Dashboard server lifecycle: starts and stops the axum HTTP server.
//!
//! bind → spawn background task → return handle with shutdown channel.

use std::net::SocketAddr;
use std::path::PathBuf;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::api::router::dashboard_router_with_static;
use crate::api::types::ApiContext;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },
    #[error("Failed to get server address: {0}")]
    LocalAddr(std::io::Error),
}

// ═══════════════════════════════════════════════════════════
// Server handle
// ═══════════════════════════════════════════════════════════

/// Handle to a running dashboard server.
pub struct DashboardServer {
    pub addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl DashboardServer {
    /// Shut down the server gracefully.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("Dashboard server shutdown signal sent");
        }
    }

    /// Signal shutdown and wait for in-flight requests to finish.
    pub async fn stop(mut self) {
        self.shutdown();
        if let Err(e) = self.task.await {
            tracing::error!("Dashboard server task failed: {e}");
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Server lifecycle
// ═══════════════════════════════════════════════════════════

/// Bind `addr` (port 0 picks an ephemeral port), build the router and
/// spawn the axum server in a background tokio task.
pub async fn start_server(
    ctx: ApiContext,
    addr: SocketAddr,
    static_dir: Option<PathBuf>,
) -> Result<DashboardServer, ServerError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    let addr = listener.local_addr().map_err(ServerError::LocalAddr)?;
    tracing::info!(%addr, source = %ctx.source.describe(), "Dashboard server binding");

    let app = dashboard_router_with_static(ctx, static_dir.as_deref());

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("Dashboard server received shutdown signal");
        };

        tracing::info!(%addr, "Dashboard server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("Dashboard server error: {e}");
        }

        tracing::info!("Dashboard server stopped");
    });

    Ok(DashboardServer {
        addr,
        shutdown_tx: Some(shutdown_tx),
        task,
    })
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    use crate::db::fixtures::seeded_source;

    fn localhost() -> SocketAddr {
        SocketAddr::from((Ipv4Addr::LOCALHOST, 0))
    }

    #[tokio::test]
    async fn start_and_stop_server() {
        let (_dir, source) = seeded_source();
        let ctx = ApiContext::new(Arc::new(source), Duration::from_secs(5));
        let server = start_server(ctx, localhost(), None)
            .await
            .expect("server should start");
        assert!(server.addr.port() > 0);

        let mut stream = tokio::net::TcpStream::connect(server.addr).await.unwrap();
        stream
            .write_all(b"GET /api/health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        assert!(response.starts_with("HTTP/1.1 200"), "{response}");

        server.stop().await;
    }

    #[tokio::test]
    async fn bind_conflict_is_reported() {
        let (_dir, source) = seeded_source();
        let ctx = ApiContext::new(Arc::new(source), Duration::from_secs(5));
        let first = start_server(ctx.clone(), localhost(), None).await.unwrap();

        let result = start_server(ctx, first.addr, None).await;
        assert!(matches!(result, Err(ServerError::Bind { .. })));

        first.stop().await;
    }
}
