//! Connection acceptor.
//!
//! Owns the listening socket. Each accepted connection is served on its own
//! task so a stalled caller never holds up the next accept.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::dispatcher::serve_connection;
use crate::error::{Result, RpcError};
use crate::registry::Registry;

/// Pause after a failed accept before trying again.
pub const ACCEPT_ERROR_PAUSE: Duration = Duration::from_millis(50);

/// Handle to a running accept loop.
#[derive(Debug)]
pub struct ListenHandle {
    local_addr: SocketAddr,
    task: JoinHandle<()>,
}

impl ListenHandle {
    /// Address actually bound (resolves port 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Park until the accept loop ends. In normal operation it never does.
    pub async fn wait(self) {
        let _ = self.task.await;
    }

    /// Stop accepting. Calls already in flight run to completion.
    pub fn abort(&self) {
        self.task.abort();
    }
}

/// Bind `addr` and start accepting calls routed through `registry`.
///
/// # Errors
///
/// `RpcError::Bind` if the address is in use or not permitted. There is no
/// fallback port.
pub async fn start(addr: SocketAddr, registry: Arc<Registry>) -> Result<ListenHandle> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| RpcError::Bind { addr, source })?;
    let local_addr = listener
        .local_addr()
        .map_err(|source| RpcError::Bind { addr, source })?;

    debug!(%local_addr, methods = ?registry.methods(), "acceptor started");
    let task = tokio::spawn(accept_loop(listener, registry));

    Ok(ListenHandle { local_addr, task })
}

async fn accept_loop(listener: TcpListener, registry: Arc<Registry>) {
    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                debug!(%peer, "accepted connection");
                let registry = Arc::clone(&registry);
                tokio::spawn(async move {
                    if let Err(e) = serve_connection(stream, &registry).await {
                        debug!(%peer, error = %e, "call abandoned");
                    }
                });
            }
            Err(e) => {
                warn!(error = %RpcError::Accept(e), "continuing after accept failure");
                tokio::time::sleep(ACCEPT_ERROR_PAUSE).await;
            }
        }
    }
}
