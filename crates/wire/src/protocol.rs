//! Message definitions.
//!
//! A call travels as a [`RequestEnvelope`] naming the target method, with the
//! typed request encoded in `body`. The reply is a [`ResponseEnvelope`]
//! echoing the method and sequence number, carrying either an encoded typed
//! response or an error string.
//!
//! Field order is part of the wire format. Do not reorder fields.

use corelib::NodeId;
use serde::{Deserialize, Serialize};

/// Name under which the liveness probe is exposed.
pub const PING_METHOD: &str = "Node.Ping";

/// Liveness probe request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingRequest {
    /// Identifier of the calling node.
    pub sender_id: NodeId,
}

/// Liveness probe reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingResponse {
    pub message: String,
}

/// Outer request frame: which method to run and its encoded argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestEnvelope {
    pub method: String,
    /// Chosen by the caller, echoed back by the server.
    pub seq: u64,
    pub body: Vec<u8>,
}

/// Outer response frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub method: String,
    pub seq: u64,
    /// Server-side failure. When set, `body` is empty.
    pub error: Option<String>,
    pub body: Vec<u8>,
}

impl RequestEnvelope {
    pub fn new(method: impl Into<String>, seq: u64, body: Vec<u8>) -> Self {
        Self {
            method: method.into(),
            seq,
            body,
        }
    }
}

impl ResponseEnvelope {
    /// Successful reply to `request`.
    pub fn ok(request: &RequestEnvelope, body: Vec<u8>) -> Self {
        Self {
            method: request.method.clone(),
            seq: request.seq,
            error: None,
            body,
        }
    }

    /// Error reply to `request`.
    pub fn err(request: &RequestEnvelope, error: impl Into<String>) -> Self {
        Self {
            method: request.method.clone(),
            seq: request.seq,
            error: Some(error.into()),
            body: Vec::new(),
        }
    }

    /// True if this envelope answers `request`.
    pub fn answers(&self, request: &RequestEnvelope) -> bool {
        self.seq == request.seq && self.method == request.method
    }
}
