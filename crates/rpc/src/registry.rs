//! Method registry.
//!
//! Inbound calls are routed by method name through an explicit table built
//! once at startup. Typed [`Method`] implementations are wrapped into the
//! object-safe [`Handler`] so the table can hold different methods side by
//! side.
//!
//! # Thread Safety
//!
//! The registry is immutable after [`RegistryBuilder::build`] and is shared
//! between connection tasks behind an `Arc`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;
use wire::{RequestEnvelope, ResponseEnvelope, WireError};

/// A remotely callable operation with typed arguments.
#[async_trait]
pub trait Method: Send + Sync + 'static {
    /// Name callers use to reach this method, e.g. `"Node.Ping"`.
    const NAME: &'static str;

    type Request: DeserializeOwned + Send + 'static;
    type Response: Serialize + Send + 'static;

    /// Run the operation. An `Err` is reported to the caller as a remote
    /// error string.
    async fn call(&self, request: Self::Request) -> std::result::Result<Self::Response, String>;
}

/// Why a handler produced no result.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// The request body did not decode. No reply is sent.
    #[error(transparent)]
    Malformed(#[from] WireError),

    /// The operation itself failed. Reported back to the caller.
    #[error("{0}")]
    Failed(String),
}

/// Object-safe handler over encoded bodies.
#[async_trait]
pub trait Handler: Send + Sync + 'static {
    async fn handle(&self, body: &[u8]) -> std::result::Result<Vec<u8>, HandlerError>;
}

struct TypedHandler<M>(M);

#[async_trait]
impl<M: Method> Handler for TypedHandler<M> {
    async fn handle(&self, body: &[u8]) -> std::result::Result<Vec<u8>, HandlerError> {
        let request: M::Request = wire::decode(body)?;
        let response = self.0.call(request).await.map_err(HandlerError::Failed)?;
        wire::encode(&response).map_err(|e| HandlerError::Failed(e.to_string()))
    }
}

/// Routing table from method name to handler.
#[derive(Clone, Default)]
pub struct Registry {
    handlers: HashMap<String, Arc<dyn Handler>>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("methods", &self.methods())
            .finish()
    }
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Registered method names, sorted.
    pub fn methods(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn contains(&self, method: &str) -> bool {
        self.handlers.contains_key(method)
    }

    /// Route one request to its handler and build the reply.
    ///
    /// # Errors
    ///
    /// Returns `WireError` only when the request body is malformed; in that
    /// case the caller must close the connection without replying. Unknown
    /// methods and operation failures become error replies instead.
    pub async fn dispatch(
        &self,
        request: &RequestEnvelope,
    ) -> std::result::Result<ResponseEnvelope, WireError> {
        let Some(handler) = self.handlers.get(&request.method) else {
            warn!(method = %request.method, "call to unknown method");
            return Ok(ResponseEnvelope::err(
                request,
                format!("unknown method '{}'", request.method),
            ));
        };

        match handler.handle(&request.body).await {
            Ok(body) => Ok(ResponseEnvelope::ok(request, body)),
            Err(HandlerError::Failed(reason)) => Ok(ResponseEnvelope::err(request, reason)),
            Err(HandlerError::Malformed(e)) => Err(e),
        }
    }
}

/// Collects methods before the registry is frozen.
#[derive(Default)]
pub struct RegistryBuilder {
    handlers: HashMap<String, Arc<dyn Handler>>,
}

impl RegistryBuilder {
    /// Register a typed method under its `NAME`.
    ///
    /// A later registration under the same name replaces the earlier one.
    pub fn register<M: Method>(self, method: M) -> Self {
        self.register_handler(M::NAME, TypedHandler(method))
    }

    /// Register a raw handler under an explicit name.
    pub fn register_handler(mut self, name: impl Into<String>, handler: impl Handler) -> Self {
        let name = name.into();
        if self.handlers.insert(name.clone(), Arc::new(handler)).is_some() {
            warn!(method = %name, "method registered twice, keeping the latest");
        }
        self
    }

    pub fn build(self) -> Registry {
        Registry {
            handlers: self.handlers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    #[async_trait]
    impl Method for Echo {
        const NAME: &'static str = "Test.Echo";
        type Request = String;
        type Response = String;

        async fn call(&self, request: String) -> std::result::Result<String, String> {
            if request.is_empty() {
                return Err("nothing to echo".to_string());
            }
            Ok(request)
        }
    }

    fn registry() -> Registry {
        Registry::builder().register(Echo).build()
    }

    #[tokio::test]
    async fn test_routes_by_name() {
        let request = RequestEnvelope::new("Test.Echo", 5, wire::encode(&"hey".to_string()).unwrap());
        let reply = registry().dispatch(&request).await.unwrap();

        assert!(reply.answers(&request));
        assert_eq!(reply.error, None);
        assert_eq!(wire::decode::<String>(&reply.body).unwrap(), "hey");
    }

    #[tokio::test]
    async fn test_unknown_method_is_an_error_reply() {
        let request = RequestEnvelope::new("Test.Missing", 1, Vec::new());
        let reply = registry().dispatch(&request).await.unwrap();

        assert!(reply.answers(&request));
        assert!(reply.error.unwrap().contains("Test.Missing"));
        assert!(reply.body.is_empty());
    }

    #[tokio::test]
    async fn test_operation_failure_is_an_error_reply() {
        let request = RequestEnvelope::new("Test.Echo", 2, wire::encode(&String::new()).unwrap());
        let reply = registry().dispatch(&request).await.unwrap();
        assert_eq!(reply.error.as_deref(), Some("nothing to echo"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_not_answered() {
        let request = RequestEnvelope::new("Test.Echo", 3, vec![0xff]);
        let err = registry().dispatch(&request).await.unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_lists_methods() {
        let registry = registry();
        assert_eq!(registry.methods(), vec!["Test.Echo"]);
        assert!(registry.contains("Test.Echo"));
        assert!(!registry.contains("Node.Ping"));
    }
}
