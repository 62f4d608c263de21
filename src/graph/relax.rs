//! Shortest-cost labeling over hyperedges.
//!
//! A queue-driven Bellman-Ford (SPFA) relaxation where every hyperedge
//! charges its per-member cost once on entry and once on exit:
//!
//! 1. Reset every node distance and edge cost to unreached.
//! 2. Seed the source at distance 0 and enqueue it.
//! 3. Pop a node and offer its distance to each linked edge. An edge whose
//!    minimum cost drops offers `min_cost + per_member` to each member; any
//!    member whose distance drops is enqueued unless already waiting.
//! 4. Stop when the queue is empty.
//!
//! Costs are non-negative and labels only ever decrease, so the run reaches
//! a fixed point. Unreachable nodes keep `+inf`.

use petgraph::stable_graph::NodeIndex;
use rand::Rng;
use tracing::debug;

use super::engine::Hypergraph;
use super::node::NodeId;

/// Work done by one relaxation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelaxStats {
    /// Nodes popped from the queue.
    pub processed: usize,
    /// Nodes pushed onto the queue, the source included.
    pub enqueued: usize,
}

impl Hypergraph {
    /// Label every node with its minimum cost from `source`.
    ///
    /// Blocks until the fixed point is reached. Calling it again from the
    /// same source on an unchanged graph yields the same labels.
    pub fn compute_distances(&mut self, source: NodeId) -> RelaxStats {
        let source = self.node_index(source);

        for index in self.node_names.values().copied().collect::<Vec<_>>() {
            self.label_mut(index).reset();
        }
        for index in self.edge_names.values().copied().collect::<Vec<_>>() {
            self.cost_mut(index).reset();
        }
        self.queue.clear();

        let mut stats = RelaxStats::default();
        let label = self.label_mut(source);
        label.set_distance(0.0);
        label.set_in_queue(true);
        self.queue.push_back(source);
        stats.enqueued += 1;

        while let Some(node) = self.queue.pop_front() {
            let label = self.label_mut(node);
            label.set_in_queue(false);
            let distance = label.distance();
            stats.processed += 1;
            self.process(node, distance, &mut stats);
        }

        debug!(
            source = %self.arena[source].name,
            processed = stats.processed,
            enqueued = stats.enqueued,
            "relaxation reached fixed point"
        );
        stats
    }

    /// Relax from a node chosen by the seeded RNG.
    ///
    /// Returns the chosen source, or `None` if there are no nodes.
    pub fn compute_distances_from_random(&mut self) -> Option<NodeId> {
        if self.node_names.is_empty() {
            return None;
        }
        let pick = self.rng.gen_range(0..self.node_names.len());
        let index = *self.node_names.values().nth(pick)?;
        let source = NodeId::new(self.tag, index);
        self.compute_distances(source);
        Some(source)
    }

    /// Offer a dequeued node's distance to every linked edge.
    fn process(&mut self, node: NodeIndex, distance: f32, stats: &mut RelaxStats) {
        let edges: Vec<NodeIndex> = self.arena.neighbors(node).collect();
        for edge in edges {
            self.relax_edge(edge, distance, stats);
        }
    }

    fn relax_edge(&mut self, edge: NodeIndex, incoming: f32, stats: &mut RelaxStats) {
        let cost = self.cost_mut(edge);
        let Some(min_cost) = cost.relax(incoming) else {
            return;
        };
        let offer = min_cost + cost.per_member();

        let members: Vec<NodeIndex> = self.arena.neighbors(edge).collect();
        for member in members {
            let label = self.label_mut(member);
            if !label.offer(offer) || label.in_queue() {
                continue;
            }
            label.set_in_queue(true);
            self.queue.push_back(member);
            stats.enqueued += 1;
        }
    }
}
