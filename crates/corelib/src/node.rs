//! Node identity.
//!
//! Every process in the cluster is identified by a compact `NodeId` assigned
//! at startup. The identity never changes for the lifetime of the process, so
//! it can be shared freely between connection handlers without locking.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Integer identifier for a node in the cluster.
///
/// Newtype over `i64` so it is `Copy`, cheap to compare, and can travel
/// inside wire messages.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize)]
pub struct NodeId(pub i64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for NodeId {
    fn from(value: i64) -> Self {
        NodeId(value)
    }
}

/// The identity of the local process.
///
/// Read-only once constructed: there is no setter, and the struct is `Copy`
/// so each handler can hold its own copy.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Node {
    id: NodeId,
}

impl Node {
    /// Construct the local node identity.
    pub fn new(id: impl Into<NodeId>) -> Self {
        Self { id: id.into() }
    }

    /// This node's identifier.
    pub fn id(&self) -> NodeId {
        self.id
    }
}
