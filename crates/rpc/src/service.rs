//! The liveness probe.

use async_trait::async_trait;
use corelib::Node;
use tracing::info;
use wire::{PingRequest, PingResponse, PING_METHOD};

use crate::registry::Method;

/// Answers `Node.Ping` with a greeting naming both nodes.
#[derive(Debug, Clone, Copy)]
pub struct PingService {
    node: Node,
}

impl PingService {
    pub fn new(node: Node) -> Self {
        Self { node }
    }

    /// Greeting sent back to `request`'s sender.
    pub fn greeting(&self, request: &PingRequest) -> String {
        format!(
            "Hello {}, I am Node {} and I am alive!",
            request.sender_id,
            self.node.id()
        )
    }
}

#[async_trait]
impl Method for PingService {
    const NAME: &'static str = PING_METHOD;
    type Request = PingRequest;
    type Response = PingResponse;

    async fn call(&self, request: PingRequest) -> Result<PingResponse, String> {
        info!(node = %self.node.id(), from = %request.sender_id, "received ping");
        Ok(PingResponse {
            message: self.greeting(&request),
        })
    }
}
