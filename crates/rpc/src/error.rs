//! Error types for remote calls.

use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use wire::WireError;

/// Result type alias for the rpc crate.
pub type Result<T> = std::result::Result<T, RpcError>;

/// Errors raised while serving or placing a call.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    /// The listen address could not be bound. Fatal at startup.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    /// The peer could not be reached.
    #[error("failed to dial {addr}: {source}")]
    Dial {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// Bytes on the connection did not parse into the expected message.
    #[error(transparent)]
    Malformed(WireError),

    /// A single accept failed. The acceptor keeps running.
    #[error("accept failed: {0}")]
    Accept(#[source] io::Error),

    /// The peer answered with an error instead of a result.
    #[error("remote error: {0}")]
    Remote(String),

    #[error("call timed out after {0:?}")]
    Timeout(Duration),

    #[error("connection error: {0}")]
    Io(#[from] io::Error),
}

impl RpcError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        RpcError::Malformed(WireError::Malformed(reason.into()))
    }

    /// True if the failure came from unparseable bytes.
    pub fn is_malformed(&self) -> bool {
        matches!(self, RpcError::Malformed(_))
    }
}

impl From<WireError> for RpcError {
    fn from(err: WireError) -> Self {
        match err {
            WireError::Io(e) => RpcError::Io(e),
            other => RpcError::Malformed(other),
        }
    }
}
