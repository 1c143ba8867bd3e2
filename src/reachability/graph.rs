//! Reachability graph between simulated radio nodes.
//!
//! The graph is a dense `n × n` arena indexed by a small per-node index that is
//! assigned on every rebuild. Each cell stores only whether the pair has a
//! reliable link; the participation sign of a cell is derived from the
//! per-node active flags at query time:
//! - a self-loop `(n, n)` is positive iff `n` is active
//! - any other cell `(r, c)` is positive iff `active[r] == active[c]`
//!
//! This is exactly the sign produced by negating the whole row and column of a
//! node on every toggle, so toggling stays cheap and never touches the arena.
//!
//! Not thread-safe by itself: callers serialize rebuilds, toggles and queries.

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fmt;

use super::entry::Entry;
use crate::error::{ReachabilityError, ReachabilityResult};
use crate::simulation::propagation::PropagationModel;

/// Stable identity of a simulated radio node.
pub type NodeId = u32;

/// Anything that can be placed into the reachability graph.
pub trait RadioNode {
    fn node_id(&self) -> NodeId;
}

impl RadioNode for NodeId {
    fn node_id(&self) -> NodeId {
        *self
    }
}

/// How `ReachabilityGraph::is_connected` picks its traversal root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StartNodePolicy {
    /// First active node in row order.
    #[default]
    FirstActive,
    /// First row regardless of activity. An inactive root only reaches itself
    /// (and rows sharing its participation state), so this can report a
    /// disconnection even when all active nodes are mutually reachable.
    FirstRow,
}

#[derive(Debug, Clone, Default)]
pub struct ReachabilityGraph {
    /// Node ids in row/column order.
    node_ids: Vec<NodeId>,
    index: HashMap<NodeId, usize>,
    /// Row-major `node_ids.len()²` link magnitudes.
    links: Vec<bool>,
    active: Vec<bool>,
    initialized: bool,
    start_policy: StartNodePolicy,
}

impl ReachabilityGraph {
    /// Create an empty, uninitialized graph. Populate it with `rebuild`.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_start_policy(mut self, policy: StartNodePolicy) -> Self {
        self.start_policy = policy;
        self
    }

    pub fn set_start_policy(&mut self, policy: StartNodePolicy) {
        self.start_policy = policy;
    }

    pub fn start_policy(&self) -> StartNodePolicy {
        self.start_policy
    }

    /// Recompute every link from the propagation model and mark all nodes active.
    ///
    /// For each ordered pair `(src, dest)`:
    /// - `src == dest` is always linked
    /// - otherwise the pair is linked iff `model` reports a reception probability
    ///   of exactly `1.0`
    ///
    /// When the graph is uninitialized or the node count changed since the last
    /// rebuild the arena is reallocated. Toggle state never survives a rebuild.
    ///
    /// If the same id appears more than once in `nodes`, the first occurrence is
    /// used and the rest are skipped.
    ///
    /// # Preconditions
    ///
    /// `model` returns probabilities in `[0, 1]`. Values are not validated; any
    /// value other than exactly `1.0` counts as "no link".
    pub fn rebuild<N, M>(&mut self, nodes: &[N], model: &M)
    where
        N: RadioNode,
        M: PropagationModel<N> + ?Sized,
    {
        let mut index: HashMap<NodeId, usize> = HashMap::with_capacity(nodes.len());
        let mut members: Vec<&N> = Vec::with_capacity(nodes.len());
        for node in nodes {
            let node_id = node.node_id();
            if index.contains_key(&node_id) {
                log::warn!("Duplicate node_id {} skipped during reachability rebuild", node_id);
                continue;
            }
            index.insert(node_id, members.len());
            members.push(node);
        }

        let node_count = members.len();
        if !self.initialized || self.node_ids.len() != node_count {
            log::debug!("Reallocating reachability graph: {} -> {} nodes", self.node_ids.len(), node_count);
            self.links = vec![false; node_count * node_count];
            self.active = vec![true; node_count];
            self.initialized = true;
        }

        self.node_ids = members.iter().map(|node| node.node_id()).collect();
        self.index = index;

        let mut link_count = 0usize;
        for (row, src) in members.iter().enumerate() {
            for (col, dest) in members.iter().enumerate() {
                let linked = row == col || model.rx_success_probability(src, dest) == 1.0;
                self.links[row * node_count + col] = linked;
                if linked && row != col {
                    link_count += 1;
                }
            }
        }
        self.active.fill(true);

        log::debug!("Reachability graph rebuilt: {} nodes, {} reliable links", node_count, link_count);
    }

    /// Flip the participation of `node`.
    ///
    /// Equivalent to negating every entry of the node's row and every other
    /// row's entry in the node's column. Link magnitudes are untouched.
    pub fn toggle(&mut self, node: NodeId) -> ReachabilityResult<()> {
        let idx = self.index_of(node)?;
        self.active[idx] = !self.active[idx];
        log::trace!("Node {} toggled, active: {}", node, self.active[idx]);
        Ok(())
    }

    /// Destinations whose entry is strictly positive: reliable link and
    /// positive participation sign.
    pub fn get_neighbors(&self, node: NodeId) -> ReachabilityResult<HashSet<NodeId>> {
        let row = self.index_of(node)?;
        Ok(self.row_matching(row, Entry::is_positive))
    }

    /// Destinations with a reliable link in either sign.
    pub fn get_one_hop_neighbors(&self, node: NodeId) -> ReachabilityResult<HashSet<NodeId>> {
        let row = self.index_of(node)?;
        Ok(self.row_matching(row, Entry::is_nonzero))
    }

    /// Whether every active node is reachable from the traversal root over
    /// strictly positive entries.
    ///
    /// Iterative depth-first search with an explicit stack: the top of the
    /// stack pushes its next unvisited positive neighbor, or is popped when
    /// none remains. The result is `true` iff the number of visited nodes
    /// equals the number of active nodes. The root is picked according to the
    /// graph's `StartNodePolicy`; with `FirstActive` and no active node at all
    /// the graph is reported as not connected.
    pub fn is_connected(&self) -> ReachabilityResult<bool> {
        let node_count = self.node_ids.len();
        if node_count == 0 {
            return Err(ReachabilityError::EmptyGraph);
        }

        let active_count = self.active.iter().filter(|active| **active).count();
        let start = match self.start_policy {
            StartNodePolicy::FirstActive => match self.active.iter().position(|active| *active) {
                Some(idx) => idx,
                None => return Ok(false),
            },
            StartNodePolicy::FirstRow => 0,
        };

        let mut visited = vec![false; node_count];
        visited[start] = true;
        let mut visited_count = 1usize;
        // (node, next column to scan)
        let mut path: Vec<(usize, usize)> = vec![(start, 0)];

        while let Some((current, cursor)) = path.last_mut() {
            let current = *current;
            let next = (*cursor..node_count).find(|&col| !visited[col] && self.entry_at(current, col).is_positive());
            match next {
                Some(col) => {
                    *cursor = col + 1;
                    visited[col] = true;
                    visited_count += 1;
                    path.push((col, 0));
                }
                None => {
                    path.pop();
                }
            }
        }

        log::debug!(
            "Connectivity check from node {}: visited {} of {} active nodes",
            self.node_ids[start],
            visited_count,
            active_count
        );
        Ok(visited_count == active_count)
    }

    /// The adjacency entry for `(src, dest)`.
    pub fn entry(&self, src: NodeId, dest: NodeId) -> ReachabilityResult<Entry> {
        let row = self.index_of(src)?;
        let col = self.index_of(dest)?;
        Ok(self.entry_at(row, col))
    }

    pub fn is_active(&self, node: NodeId) -> ReachabilityResult<bool> {
        Ok(self.active[self.index_of(node)?])
    }

    pub fn active_nodes(&self) -> HashSet<NodeId> {
        self.node_ids.iter().zip(&self.active).filter(|(_, active)| **active).map(|(node_id, _)| *node_id).collect()
    }

    /// Node ids in row order, as registered by the last rebuild.
    pub fn node_ids(&self) -> &[NodeId] {
        &self.node_ids
    }

    pub fn node_count(&self) -> usize {
        self.node_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_ids.is_empty()
    }

    fn index_of(&self, node: NodeId) -> ReachabilityResult<usize> {
        self.index.get(&node).copied().ok_or(ReachabilityError::UnknownNode(node))
    }

    fn entry_at(&self, row: usize, col: usize) -> Entry {
        let participating = if row == col { self.active[row] } else { self.active[row] == self.active[col] };
        Entry {
            linked: self.links[row * self.node_ids.len() + col],
            participating,
        }
    }

    fn row_matching(&self, row: usize, predicate: impl Fn(&Entry) -> bool) -> HashSet<NodeId> {
        (0..self.node_ids.len())
            .filter(|&col| predicate(&self.entry_at(row, col)))
            .map(|col| self.node_ids[col])
            .collect()
    }
}

/// Diagnostic dump of the signed adjacency matrix. Not a stable format.
impl fmt::Display for ReachabilityGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>8} |", "src\\dest")?;
        for node_id in &self.node_ids {
            write!(f, " {:>5}", node_id)?;
        }
        writeln!(f)?;

        for (row, node_id) in self.node_ids.iter().enumerate() {
            write!(f, "{:>8} |", node_id)?;
            for col in 0..self.node_ids.len() {
                write!(f, " {:>5}", self.entry_at(row, col).value())?;
            }
            writeln!(f, "{}", if self.active[row] { "" } else { "  (inactive)" })?;
        }
        Ok(())
    }
}
