//! Hypergraph - entity registry and arena.
//!
//! Nodes and edges both live as vertices of one petgraph `StableGraph`. An
//! attachment is an arena link between a node vertex and an edge vertex, so
//! the arena is the incidence graph of the hypergraph and the neighbors of
//! any vertex are exactly the entities linked to it.

use std::collections::{BTreeMap, VecDeque};

use petgraph::Undirected;
use petgraph::stable_graph::{NodeIndex, StableGraph};
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use tracing::{trace, warn};
use vek::{Aabr, Vec2};

use super::edge::{EdgeCost, EdgeId};
use super::entity::{Body, EntityId, GraphTag, Vertex, VertexKind};
use super::node::{NodeId, NodeLabel};
use crate::config::SimConfig;
use crate::error::ConfigError;
use crate::spatial::{CandidatePair, PickIndex, UniformGrid};

/// Floats per slot in `Hypergraph::render_buffer`.
pub const RENDER_STRIDE: usize = 5;

/// The hypergraph and everything it owns.
///
/// This struct manages:
/// - The entity arena (nodes and edges, with their bodies)
/// - Name registries and insertion-ordered listings per kind
/// - The relaxation work queue (empty between runs)
/// - The broad-phase grid and pick index (rebuilt every tick)
///
/// There is no internal locking. Share it across threads behind a `Mutex`.
pub struct Hypergraph {
    /// Identifies handles issued by this graph.
    pub(super) tag: GraphTag,

    /// Node and edge vertices, linked by attachments.
    pub(super) arena: StableGraph<Vertex, (), Undirected>,

    /// Node registry by name.
    pub(super) node_names: BTreeMap<String, NodeIndex>,

    /// Edge registry by name.
    pub(super) edge_names: BTreeMap<String, NodeIndex>,

    /// Nodes in insertion order, reordered by distance in `order_graph`.
    pub(super) ordered_nodes: Vec<NodeId>,

    /// Edges in insertion order, reordered by cost in `order_graph`.
    pub(super) ordered_edges: Vec<EdgeId>,

    /// Relaxation work queue
    pub(super) queue: VecDeque<NodeIndex>,

    /// Broad-phase grid
    pub(super) grid: UniformGrid,

    /// Candidate pairs from the most recent tick
    pub(super) candidates: Vec<CandidatePair>,

    /// Point-picking index
    pub(super) picker: PickIndex,

    /// Whether bodies changed since the pick index was built
    pub(super) pick_dirty: bool,

    pub(super) config: SimConfig,

    /// Spawn positions and random source selection
    pub(super) rng: Pcg32,
}

impl Hypergraph {
    /// Create an empty graph with the default configuration.
    pub fn new() -> Self {
        Self::build(SimConfig::default())
    }

    /// Create an empty graph with a validated configuration.
    pub fn with_config(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: SimConfig) -> Self {
        Self {
            tag: GraphTag::next(),
            arena: StableGraph::default(),
            node_names: BTreeMap::new(),
            edge_names: BTreeMap::new(),
            ordered_nodes: Vec::new(),
            ordered_edges: Vec::new(),
            queue: VecDeque::new(),
            grid: UniformGrid::new(&config),
            candidates: Vec::new(),
            picker: PickIndex::new(),
            pick_dirty: false,
            rng: Pcg32::seed_from_u64(config.seed),
            config,
        }
    }

    /// The configuration this graph was built with.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    // =========================================================================
    // Registration
    // =========================================================================

    fn spawn_body(&mut self) -> Body {
        let x = self.rng.gen_range(0.0..self.config.world_width);
        let y = self.rng.gen_range(0.0..self.config.world_height);
        Body::new(Vec2::new(x, y), self.config.default_size)
    }

    /// Register a node. A name already in use returns the existing node.
    pub fn create_node(&mut self, name: &str) -> NodeId {
        if let Some(&index) = self.node_names.get(name) {
            trace!(name, "ignoring duplicate node registration");
            return NodeId::new(self.tag, index);
        }

        let body = self.spawn_body();
        let index = self.arena.add_node(Vertex {
            name: name.to_owned(),
            body,
            kind: VertexKind::Node(NodeLabel::new()),
        });
        self.node_names.insert(name.to_owned(), index);

        let id = NodeId::new(self.tag, index);
        self.ordered_nodes.push(id);
        self.pick_dirty = true;
        id
    }

    /// Register a hyperedge. A name already in use returns the existing edge
    /// and keeps its original base cost.
    ///
    /// Negative or NaN base costs are clamped to zero, since relaxation
    /// relies on non-negative costs to terminate.
    pub fn create_edge(&mut self, name: &str, base_cost: f32) -> EdgeId {
        if let Some(&index) = self.edge_names.get(name) {
            trace!(name, "ignoring duplicate edge registration");
            return EdgeId::new(self.tag, index);
        }

        let base_cost = if base_cost >= 0.0 {
            base_cost
        } else {
            warn!(name, base_cost, "negative edge cost clamped to zero");
            0.0
        };

        let body = self.spawn_body();
        let index = self.arena.add_node(Vertex {
            name: name.to_owned(),
            body,
            kind: VertexKind::Edge(EdgeCost::new(base_cost)),
        });
        self.edge_names.insert(name.to_owned(), index);

        let id = EdgeId::new(self.tag, index);
        self.ordered_edges.push(id);
        self.pick_dirty = true;
        id
    }

    /// Link a node and an edge in both directions.
    ///
    /// Idempotent. On a new link the edge's per-member cost is recomputed
    /// from its new member count. Returns true if the link was new.
    pub fn attach(&mut self, node: NodeId, edge: EdgeId) -> bool {
        let node = self.node_index(node);
        let edge = self.edge_index(edge);
        if self.arena.contains_edge(node, edge) {
            return false;
        }

        self.arena.add_edge(node, edge, ());
        let members = self.arena.neighbors(edge).count();
        self.cost_mut(edge).set_member_count(members);
        true
    }

    /// Get the number of nodes.
    pub fn node_count(&self) -> usize {
        self.node_names.len()
    }

    /// Get the number of edges.
    pub fn edge_count(&self) -> usize {
        self.edge_names.len()
    }

    /// Look up a node by name.
    pub fn find_node(&self, name: &str) -> Option<NodeId> {
        self.node_names
            .get(name)
            .map(|&index| NodeId::new(self.tag, index))
    }

    /// Look up an edge by name.
    pub fn find_edge(&self, name: &str) -> Option<EdgeId> {
        self.edge_names
            .get(name)
            .map(|&index| EdgeId::new(self.tag, index))
    }

    /// Rebuild a node handle from its raw slot, if the slot holds a node.
    pub fn node_id(&self, raw: u32) -> Option<NodeId> {
        let index = NodeIndex::new(raw as usize);
        match self.arena.node_weight(index)?.kind {
            VertexKind::Node(_) => Some(NodeId::new(self.tag, index)),
            VertexKind::Edge(_) => None,
        }
    }

    /// Rebuild an edge handle from its raw slot, if the slot holds an edge.
    pub fn edge_id(&self, raw: u32) -> Option<EdgeId> {
        let index = NodeIndex::new(raw as usize);
        match self.arena.node_weight(index)?.kind {
            VertexKind::Edge(_) => Some(EdgeId::new(self.tag, index)),
            VertexKind::Node(_) => None,
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Distance label from the last relaxation run (`+inf` if unreached).
    pub fn distance(&self, node: NodeId) -> f32 {
        self.label(self.node_index(node)).distance()
    }

    /// Minimum cost from the last relaxation run (`+inf` if unreached).
    pub fn cost(&self, edge: EdgeId) -> f32 {
        self.edge_cost(self.edge_index(edge)).min_cost()
    }

    /// Base cost the edge was created with.
    pub fn base_cost(&self, edge: EdgeId) -> f32 {
        self.edge_cost(self.edge_index(edge)).base()
    }

    /// Base cost divided by the current member count.
    pub fn per_member_cost(&self, edge: EdgeId) -> f32 {
        self.edge_cost(self.edge_index(edge)).per_member()
    }

    /// Whether the node is waiting in the relaxation queue.
    pub fn is_queued(&self, node: NodeId) -> bool {
        self.label(self.node_index(node)).in_queue()
    }

    /// Edges linked to a node.
    pub fn node_edges(&self, node: NodeId) -> Vec<EdgeId> {
        self.arena
            .neighbors(self.node_index(node))
            .map(|index| EdgeId::new(self.tag, index))
            .collect()
    }

    /// Nodes attached to an edge.
    pub fn edge_nodes(&self, edge: EdgeId) -> Vec<NodeId> {
        self.arena
            .neighbors(self.edge_index(edge))
            .map(|index| NodeId::new(self.tag, index))
            .collect()
    }

    /// Registered name of an entity.
    pub fn name(&self, entity: impl Into<EntityId>) -> &str {
        &self.arena[self.entity_index(entity.into())].name
    }

    /// Physical state of an entity.
    pub fn body(&self, entity: impl Into<EntityId>) -> &Body {
        &self.arena[self.entity_index(entity.into())].body
    }

    /// Current bounding box of an entity.
    pub fn bounding_box(&self, entity: impl Into<EntityId>) -> Aabr<f32> {
        self.body(entity).bounding_box()
    }

    /// Move an entity, e.g. when the user drags it.
    pub fn set_position(&mut self, entity: impl Into<EntityId>, x: f32, y: f32) {
        let index = self.entity_index(entity.into());
        self.arena[index].body.position = Vec2::new(x, y);
        self.pick_dirty = true;
    }

    /// Resize an entity. Negative or non-finite sizes are ignored.
    pub fn set_size(&mut self, entity: impl Into<EntityId>, size: f32) {
        let entity = entity.into();
        if !(size.is_finite() && size >= 0.0) {
            warn!(%entity, size, "ignoring invalid entity size");
            return;
        }
        let index = self.entity_index(entity);
        self.arena[index].body.size = size;
        self.pick_dirty = true;
    }

    // =========================================================================
    // Buffer Access
    // =========================================================================

    /// Flat per-slot render data for the renderer.
    ///
    /// `RENDER_STRIDE` floats per arena slot, in slot order:
    /// `[x, y, size, kind, label]` where kind is 0 for nodes and 1 for
    /// edges, and label is the distance or cost.
    pub fn render_buffer(&self) -> Vec<f32> {
        let mut buffer = Vec::with_capacity(self.arena.node_count() * RENDER_STRIDE);
        for vertex in self.arena.node_weights() {
            let (kind, label) = match &vertex.kind {
                VertexKind::Node(label) => (0.0, label.distance()),
                VertexKind::Edge(cost) => (1.0, cost.min_cost()),
            };
            buffer.extend_from_slice(&[
                vertex.body.position.x,
                vertex.body.position.y,
                vertex.body.size,
                kind,
                label,
            ]);
        }
        buffer
    }

    // =========================================================================
    // Handle checks
    // =========================================================================

    #[track_caller]
    fn check_tag(&self, tag: GraphTag) {
        assert_eq!(
            tag, self.tag,
            "handle was issued by a different Hypergraph"
        );
    }

    #[track_caller]
    pub(super) fn node_index(&self, node: NodeId) -> NodeIndex {
        self.check_tag(node.tag);
        node.index()
    }

    #[track_caller]
    pub(super) fn edge_index(&self, edge: EdgeId) -> NodeIndex {
        self.check_tag(edge.tag);
        edge.index()
    }

    #[track_caller]
    pub(super) fn entity_index(&self, entity: EntityId) -> NodeIndex {
        self.check_tag(entity.tag());
        entity.index()
    }

    // Handles are only minted for slots of the matching kind, so the
    // accessors below cannot see the other variant.

    pub(super) fn label(&self, index: NodeIndex) -> &NodeLabel {
        match &self.arena[index].kind {
            VertexKind::Node(label) => label,
            VertexKind::Edge(_) => unreachable!("node handle points at an edge"),
        }
    }

    pub(super) fn label_mut(&mut self, index: NodeIndex) -> &mut NodeLabel {
        match &mut self.arena[index].kind {
            VertexKind::Node(label) => label,
            VertexKind::Edge(_) => unreachable!("node handle points at an edge"),
        }
    }

    pub(super) fn edge_cost(&self, index: NodeIndex) -> &EdgeCost {
        match &self.arena[index].kind {
            VertexKind::Edge(cost) => cost,
            VertexKind::Node(_) => unreachable!("edge handle points at a node"),
        }
    }

    pub(super) fn cost_mut(&mut self, index: NodeIndex) -> &mut EdgeCost {
        match &mut self.arena[index].kind {
            VertexKind::Edge(cost) => cost,
            VertexKind::Node(_) => unreachable!("edge handle points at a node"),
        }
    }
}

impl Default for Hypergraph {
    fn default() -> Self {
        Self::new()
    }
}
