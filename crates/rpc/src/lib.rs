//! Remote invocation between nodes.
//!
//! This crate provides both halves of a call:
//! - Server side: a method registry, the per-connection dispatcher, and the
//!   connection acceptor that feeds it
//! - Client side: the invoker that dials a peer and waits for one reply
//!
//! Each connection carries exactly one call.

pub mod acceptor;
pub mod client;
pub mod dispatcher;
pub mod error;
pub mod registry;
pub mod service;

pub use acceptor::{start, ListenHandle};
pub use client::{invoke, ping};
pub use dispatcher::serve_connection;
pub use error::{Result, RpcError};
pub use registry::{Handler, HandlerError, Method, Registry, RegistryBuilder};
pub use service::PingService;
