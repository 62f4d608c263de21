//! Hyperedge handle and cost state.
//!
//! A hyperedge connects any number of nodes. Its base cost is split evenly
//! across the attached nodes, and a path through the edge pays that share
//! once on the way in and once on the way out.

use std::fmt;

use petgraph::stable_graph::NodeIndex;

use super::entity::GraphTag;

/// Stable edge handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeId {
    pub(crate) tag: GraphTag,
    slot: u32,
}

impl EdgeId {
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

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Edge({})", self.slot)
    }
}

/// Cost state of a hyperedge.
#[derive(Debug, Clone, Copy)]
pub struct EdgeCost {
    base: f32,
    per_member: f32,
    min_cost: f32,
}

impl EdgeCost {
    /// Create the cost state for an edge with no members yet.
    pub fn new(base: f32) -> Self {
        Self {
            base,
            per_member: base,
            min_cost: f32::INFINITY,
        }
    }

    #[inline]
    pub fn base(&self) -> f32 {
        self.base
    }

    /// The base cost shared among the members attached so far.
    #[inline]
    pub fn per_member(&self) -> f32 {
        self.per_member
    }

    /// Cheapest cost of reaching this edge in the last relaxation run.
    #[inline]
    pub fn min_cost(&self) -> f32 {
        self.min_cost
    }

    /// Recompute the share after the member count changed.
    #[inline]
    pub fn set_member_count(&mut self, count: usize) {
        self.per_member = self.base / count.max(1) as f32;
    }

    /// Offer the distance of an incident node.
    ///
    /// Returns the new minimum cost if entering through that node is
    /// strictly cheaper than any entry seen so far.
    #[inline]
    pub fn relax(&mut self, incoming: f32) -> Option<f32> {
        let candidate = incoming + self.per_member;
        if candidate < self.min_cost {
            self.min_cost = candidate;
            Some(candidate)
        } else {
            None
        }
    }

    /// Forget the minimum cost of the previous run.
    #[inline]
    pub fn reset(&mut self) {
        self.min_cost = f32::INFINITY;
    }
}
