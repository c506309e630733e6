//! Core library for the peer liveness probe.
//!
//! This crate provides the pieces every other crate in the workspace shares:
//! - Node identity (`NodeId`, `Node`)
//! - Peer and listen addressing
//! - Validated node configuration
//! - The common configuration error type

pub mod config;
pub mod error;
pub mod network;
pub mod node;

pub use config::NodeConfig;
pub use error::{Error, Result};
pub use network::PeerAddress;
pub use node::{Node, NodeId};
