//! Command-line flags.

use std::net::IpAddr;
use std::time::Duration;

use clap::Parser;
use corelib::{NodeConfig, NodeId, PeerAddress};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug, Clone)]
#[command(name = "pingnode")]
#[command(about = "Peer-to-peer liveness probe node")]
pub struct CliConfig {
    /// Unique ID for the node
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    pub id: i64,

    /// Port to listen on
    #[arg(short, long, default_value_t = corelib::config::DEFAULT_PORT)]
    pub port: u16,

    /// Peer to ping once after warm-up: a port (e.g. 8001) or host:port
    #[arg(long)]
    pub peer: Option<PeerAddress>,

    /// Interface to listen on
    #[arg(long, default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Delay before pinging the peer, in milliseconds
    #[arg(long, default_value_t = 2000)]
    pub warmup_ms: u64,

    /// Give up on the peer call after this many milliseconds (default: wait forever)
    #[arg(long)]
    pub call_timeout_ms: Option<u64>,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,
}

impl CliConfig {
    /// Typed, validated node configuration.
    pub fn node_config(&self) -> corelib::Result<NodeConfig> {
        let config = NodeConfig {
            id: NodeId(self.id),
            host: self.host,
            port: self.port,
            peer: self.peer.clone(),
            warmup: Duration::from_millis(self.warmup_ms),
            call_timeout: self.call_timeout_ms.map(Duration::from_millis),
        };
        config.validate()?;
        Ok(config)
    }

    /// Install the global log subscriber. Call once.
    pub fn init_logging(&self) {
        let level = if self.debug { Level::DEBUG } else { Level::INFO };
        FmtSubscriber::builder()
            .with_max_level(level)
            .with_target(false)
            .compact()
            .init();
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        crate::commands::run(self.node_config()?).await
    }
}
