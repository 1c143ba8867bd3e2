//! Errors raised by the reachability graph.

use crate::reachability::NodeId;

/// Errors that can occur while querying or mutating a `ReachabilityGraph`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReachabilityError {
    /// The node was not part of the node set at the last rebuild.
    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),

    /// A connectivity check was requested on a graph without rows.
    #[error("Reachability graph is empty")]
    EmptyGraph,
}

pub type ReachabilityResult<T> = Result<T, ReachabilityError>;
