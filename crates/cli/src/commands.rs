//! Node startup.
//!
//! Order matters: the listen port is bound first (and a failure there ends
//! the process), then after the warm-up delay the configured peer is probed
//! exactly once, then the node serves inbound calls until killed.

use std::fmt;
use std::sync::Arc;

use anyhow::Context;
use corelib::{Node, NodeConfig};
use rpc::{ListenHandle, PingService, Registry};
use tracing::{info, warn};

/// Result of the single outbound probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The peer answered with this message.
    Reply(String),
    /// The call failed; the reason is human-readable.
    Failed(String),
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeOutcome::Reply(message) => write!(f, ">>> Response from Peer: {}", message),
            ProbeOutcome::Failed(reason) => write!(f, "Could not connect to peer: {}", reason),
        }
    }
}

/// Bind the listen address and start serving `Node.Ping`.
pub async fn start_node(config: &NodeConfig) -> anyhow::Result<ListenHandle> {
    let node = Node::new(config.id);
    let registry = Registry::builder().register(PingService::new(node)).build();

    let handle = rpc::start(config.listen_addr(), Arc::new(registry))
        .await
        .with_context(|| format!("Node {} cannot listen on port {}", config.id, config.port))?;

    info!(
        "Node {} is listening on port {}...",
        config.id,
        handle.local_addr().port()
    );
    Ok(handle)
}

/// Call the configured peer once. `None` when no peer is configured.
pub async fn probe_peer(config: &NodeConfig) -> Option<ProbeOutcome> {
    let peer = config.peer.as_ref()?;

    let outcome = match rpc::ping(peer, config.id, config.call_timeout).await {
        Ok(reply) => ProbeOutcome::Reply(reply.message),
        Err(e) => {
            warn!(%peer, error = %e, "peer probe failed");
            ProbeOutcome::Failed(e.to_string())
        }
    };
    Some(outcome)
}

/// Run a node until the process is terminated.
pub async fn run(config: NodeConfig) -> anyhow::Result<()> {
    let handle = start_node(&config).await?;

    tokio::time::sleep(config.warmup).await;
    if let Some(outcome) = probe_peer(&config).await {
        println!("{}", outcome);
    }

    handle.wait().await;
    Ok(())
}
