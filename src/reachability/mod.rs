//! Directed reachability graph over a dynamic set of radio nodes.
//!
//! ## Module Organization
//!
//! - `entry`: per-pair adjacency entry (link magnitude plus participation sign)
//! - `graph`: the `ReachabilityGraph` itself
//!
//! The graph only keeps node ids. Node enumeration and link probabilities are
//! passed into `ReachabilityGraph::rebuild` by the caller on every rebuild.

pub mod entry;
pub mod graph;

pub use entry::{Entry, LinkState};
pub use graph::{NodeId, RadioNode, ReachabilityGraph, StartNodePolicy};
