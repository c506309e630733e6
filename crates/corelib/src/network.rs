//! Peer addressing.
//!
//! A peer is given on the command line either as a bare port (`"8000"`,
//! meaning a node on the same host) or as `host:port`.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Host used when a peer is given as a bare port.
pub const LOCAL_HOST: &str = "localhost";

/// Address of a remote node to call.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PeerAddress {
    host: String,
    port: u16,
}

impl PeerAddress {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Peer on the local host.
    pub fn local(port: u16) -> Self {
        Self::new(LOCAL_HOST, port)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for PeerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            // IPv6 literal
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

impl FromStr for PeerAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let input = s.trim();
        if input.is_empty() {
            return Err(Error::invalid_address(s, "empty"));
        }

        let Some((host, port)) = input.rsplit_once(':') else {
            return parse_port(s, input).map(Self::local);
        };

        let host = host.trim_start_matches('[').trim_end_matches(']');
        if host.is_empty() {
            return Err(Error::invalid_address(s, "missing host"));
        }
        Ok(Self::new(host, parse_port(s, port)?))
    }
}

fn parse_port(input: &str, port: &str) -> Result<u16> {
    match port.parse::<u16>() {
        Ok(0) => Err(Error::invalid_address(input, "port 0 cannot be dialed")),
        Ok(port) => Ok(port),
        Err(e) => Err(Error::invalid_address(input, format!("bad port: {}", e))),
    }
}
