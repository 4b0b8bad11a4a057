use thiserror::Error;

use crate::{NodeId, Slot};

// -----------------------------------------------------------------------------
// Error

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GraphError {
    #[error("node {0} does not exist in this graph")]
    Dangling(NodeId),

    #[error("node {0} is reachable from itself and cannot be written as a tree")]
    Cycle(NodeId),

    #[error("node {node} has no slot {slot}")]
    InvalidSlot { node: NodeId, slot: Slot },
}
