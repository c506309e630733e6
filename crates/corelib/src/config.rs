//! Node configuration.
//!
//! `NodeConfig` is the typed, validated form of the startup inputs: the local
//! identifier, where to listen, and the optional single peer to probe.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::network::PeerAddress;
use crate::node::NodeId;

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8000;

/// Default delay before the outbound probe, giving the peer time to start.
pub const DEFAULT_WARMUP: Duration = Duration::from_secs(2);

/// Startup configuration for one node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeConfig {
    pub id: NodeId,
    /// Interface to bind. Defaults to all interfaces.
    pub host: IpAddr,
    pub port: u16,
    /// Peer to probe once after warm-up, if any.
    pub peer: Option<PeerAddress>,
    pub warmup: Duration,
    /// Upper bound on the outbound call. `None` waits indefinitely.
    pub call_timeout: Option<Duration>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            id: NodeId::default(),
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            peer: None,
            warmup: DEFAULT_WARMUP,
            call_timeout: None,
        }
    }
}

impl NodeConfig {
    pub fn new(id: impl Into<NodeId>, port: u16) -> Self {
        Self {
            id: id.into(),
            port,
            ..Self::default()
        }
    }

    pub fn with_peer(mut self, peer: PeerAddress) -> Self {
        self.peer = Some(peer);
        self
    }

    /// Socket address the acceptor binds.
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Reject combinations that can never work.
    pub fn validate(&self) -> Result<()> {
        if self.call_timeout == Some(Duration::ZERO) {
            return Err(Error::InvalidConfig(
                "call timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_listen_on_all_interfaces() {
        let config = NodeConfig::default();
        assert_eq!(config.listen_addr().to_string(), "0.0.0.0:8000");
        assert_eq!(config.warmup, Duration::from_secs(2));
        assert!(config.peer.is_none());
        assert!(config.call_timeout.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let mut config = NodeConfig::new(1, 8001).with_peer(PeerAddress::local(8000));
        config.call_timeout = Some(Duration::ZERO);
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }
}
