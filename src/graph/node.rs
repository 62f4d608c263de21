//! Node handle and distance label.
//!
//! Nodes are the vertices of the hypergraph. Each node has:
//! - A stable handle tied to the graph that issued it
//! - A distance label, unreached (`+inf`) until a relaxation run touches it
//! - An in-queue flag used while the relaxation queue drains

use std::fmt;

use petgraph::stable_graph::NodeIndex;

use super::entity::GraphTag;

/// Stable node handle.
///
/// Carries the arena slot and the tag of the owning graph, so a handle
/// passed to the wrong graph is caught instead of aliasing another entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub(crate) tag: GraphTag,
    slot: u32,
}

impl NodeId {
    #[inline]
    pub(crate) fn new(tag: GraphTag, index: NodeIndex) -> Self {
        Self {
            tag,
            slot: index.index() as u32,
        }
    }

    /// Get the raw slot value.
    #[inline]
    pub fn raw(self) -> u32 {
        self.slot
    }

    #[inline]
    pub(crate) fn index(self) -> NodeIndex {
        NodeIndex::new(self.slot as usize)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.slot)
    }
}

/// Relaxation state of a node.
#[derive(Debug, Clone, Copy)]
pub struct NodeLabel {
    distance: f32,
    in_queue: bool,
}

impl NodeLabel {
    /// Create an unreached label.
    #[inline]
    pub fn new() -> Self {
        Self {
            distance: f32::INFINITY,
            in_queue: false,
        }
    }

    #[inline]
    pub fn distance(&self) -> f32 {
        self.distance
    }

    #[inline]
    pub fn set_distance(&mut self, distance: f32) {
        self.distance = distance;
    }

    /// Whether any relaxation run has reached this node.
    #[inline]
    pub fn is_reached(&self) -> bool {
        self.distance.is_finite()
    }

    #[inline]
    pub fn in_queue(&self) -> bool {
        self.in_queue
    }

    #[inline]
    pub fn set_in_queue(&mut self, in_queue: bool) {
        self.in_queue = in_queue;
    }

    /// Lower the distance to `candidate` if it is strictly smaller.
    ///
    /// Returns true if the label changed.
    #[inline]
    pub fn offer(&mut self, candidate: f32) -> bool {
        if candidate < self.distance {
            self.distance = candidate;
            true
        } else {
            false
        }
    }

    /// Back to unreached and not queued.
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for NodeLabel {
    fn default() -> Self {
        Self::new()
    }
}
