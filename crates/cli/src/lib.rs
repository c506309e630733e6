//! Command-line node for the peer liveness probe.
//!
//! Provides:
//! - Flag parsing into a validated `NodeConfig`
//! - Startup ordering: bind, warm up, probe the peer once, serve forever

pub mod commands;
pub mod config;

pub use commands::{run, ProbeOutcome};
pub use config::CliConfig;
