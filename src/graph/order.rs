//! Display ordering of the registries.
//!
//! The listings keep insertion order until `order_graph` sorts them by the
//! labels of the last relaxation run. Before sorting they are checked
//! against the registries and rebuilt from them if the sizes disagree.

use tracing::{debug, warn};

use super::edge::EdgeId;
use super::engine::Hypergraph;
use super::node::NodeId;

/// Nodes by ascending distance and edges by ascending cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub nodes: Vec<NodeId>,
    pub edges: Vec<EdgeId>,
}

/// Name and label of every entity, in name order.
#[derive(Debug, Clone, PartialEq)]
pub struct Labels {
    pub nodes: Vec<(String, f32)>,
    pub edges: Vec<(String, f32)>,
}

impl Hypergraph {
    /// Repair the listings if needed, then sort them by label.
    ///
    /// Sorting is stable, so ties keep their previous relative order and
    /// unreached entities (`+inf`) go last.
    pub fn order_graph(&mut self) {
        if self.ordered_nodes.len() != self.node_names.len() {
            warn!(
                listed = self.ordered_nodes.len(),
                registered = self.node_names.len(),
                "node listing out of sync with registry, rebuilding"
            );
            self.ordered_nodes = self
                .node_names
                .values()
                .map(|&index| NodeId::new(self.tag, index))
                .collect();
        }
        if self.ordered_edges.len() != self.edge_names.len() {
            warn!(
                listed = self.ordered_edges.len(),
                registered = self.edge_names.len(),
                "edge listing out of sync with registry, rebuilding"
            );
            self.ordered_edges = self
                .edge_names
                .values()
                .map(|&index| EdgeId::new(self.tag, index))
                .collect();
        }

        let mut nodes: Vec<(f32, NodeId)> = self
            .ordered_nodes
            .iter()
            .map(|&id| (self.label(id.index()).distance(), id))
            .collect();
        nodes.sort_by(|a, b| a.0.total_cmp(&b.0));
        self.ordered_nodes = nodes.into_iter().map(|(_, id)| id).collect();

        let mut edges: Vec<(f32, EdgeId)> = self
            .ordered_edges
            .iter()
            .map(|&id| (self.edge_cost(id.index()).min_cost(), id))
            .collect();
        edges.sort_by(|a, b| a.0.total_cmp(&b.0));
        self.ordered_edges = edges.into_iter().map(|(_, id)| id).collect();
    }

    /// Order the graph and return both listings.
    pub fn ordered_snapshot(&mut self) -> Snapshot {
        self.order_graph();
        Snapshot {
            nodes: self.ordered_nodes.clone(),
            edges: self.ordered_edges.clone(),
        }
    }

    /// Current labels of all entities, in name order.
    pub fn labels(&self) -> Labels {
        Labels {
            nodes: self
                .node_names
                .iter()
                .map(|(name, &index)| (name.clone(), self.label(index).distance()))
                .collect(),
            edges: self
                .edge_names
                .iter()
                .map(|(name, &index)| (name.clone(), self.edge_cost(index).min_cost()))
                .collect(),
        }
    }

    /// Log every label at debug level.
    pub fn dump_labels(&self) {
        let labels = self.labels();
        for (name, distance) in &labels.nodes {
            debug!(node = %name, distance);
        }
        for (name, cost) in &labels.edges {
            debug!(edge = %name, cost);
        }
    }
}
