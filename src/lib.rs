//! Hypergraph - WASM Module
//!
//! A live graph of named nodes and hyperedges (edges joining any number of
//! nodes). It labels every node with its minimum cost from a chosen source,
//! and runs a kinematic simulation where linked entities pull toward each
//! other while a uniform grid reports candidate overlapping pairs.
//!
//! # Architecture
//!
//! - `graph`: entity arena, registries, relaxation, ordering, tick driver
//! - `spatial`: uniform grid broad phase and R-tree pick index
//! - `layout`: neighbor attraction and Euler integration
//! - `config`: world and grid parameters
//!
//! Rendering, text, and input routing live on the JavaScript side and only
//! read positions, bounding boxes and labels through `HypergraphWasm`.

use js_sys::Float32Array;
use serde::Serialize;
use wasm_bindgen::prelude::*;

pub mod config;
pub mod error;
pub mod graph;
pub mod layout;
pub mod spatial;

pub use config::SimConfig;
pub use error::ConfigError;
pub use graph::{EdgeId, EntityId, Hypergraph, NodeId};

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Entity reference as seen from JavaScript: `{ kind: "node", id: 3 }`.
#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum JsEntity {
    Node { id: u32 },
    Edge { id: u32 },
}

impl From<EntityId> for JsEntity {
    fn from(entity: EntityId) -> Self {
        match entity {
            EntityId::Node(id) => JsEntity::Node { id: id.raw() },
            EntityId::Edge(id) => JsEntity::Edge { id: id.raw() },
        }
    }
}

#[derive(Serialize)]
struct JsPair {
    a: JsEntity,
    b: JsEntity,
}

#[derive(Serialize)]
struct JsSnapshot {
    nodes: Vec<u32>,
    edges: Vec<u32>,
}

fn bounds(graph: &Hypergraph, entity: EntityId) -> Vec<f32> {
    let bbox = graph.bounding_box(entity);
    vec![bbox.min.x, bbox.min.y, bbox.max.x, bbox.max.y]
}

/// Main entry point for the hypergraph.
///
/// This struct wraps the internal Hypergraph and provides the public API
/// exposed to JavaScript. Handles cross the boundary as raw slot numbers;
/// unknown slots are reported as `false` / `undefined` rather than panics.
#[wasm_bindgen]
pub struct HypergraphWasm {
    graph: Hypergraph,
}

#[wasm_bindgen]
impl HypergraphWasm {
    /// Create a new empty graph with the default configuration.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            graph: Hypergraph::new(),
        }
    }

    /// Create a graph from a configuration object.
    ///
    /// Missing fields take their defaults, e.g. `{ cellSize: 32 }`.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(config: JsValue) -> Result<HypergraphWasm, JsError> {
        let config: SimConfig = serde_wasm_bindgen::from_value(config)?;
        Ok(Self {
            graph: Hypergraph::with_config(config)?,
        })
    }

    /// The active configuration, with defaults filled in.
    #[wasm_bindgen(js_name = getConfig)]
    pub fn get_config(&self) -> Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(self.graph.config())?)
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register a node, or return the existing one with this name.
    #[wasm_bindgen(js_name = createNode)]
    pub fn create_node(&mut self, name: &str) -> u32 {
        self.graph.create_node(name).raw()
    }

    /// Register a hyperedge, or return the existing one with this name.
    #[wasm_bindgen(js_name = createEdge)]
    pub fn create_edge(&mut self, name: &str, base_cost: f32) -> u32 {
        self.graph.create_edge(name, base_cost).raw()
    }

    /// Link a node and an edge.
    ///
    /// Returns false if either ID is unknown or the link already existed.
    pub fn attach(&mut self, node_id: u32, edge_id: u32) -> bool {
        match (self.graph.node_id(node_id), self.graph.edge_id(edge_id)) {
            (Some(node), Some(edge)) => self.graph.attach(node, edge),
            _ => false,
        }
    }

    /// Get the number of nodes.
    #[wasm_bindgen(js_name = nodeCount)]
    pub fn node_count(&self) -> u32 {
        self.graph.node_count() as u32
    }

    /// Get the number of edges.
    #[wasm_bindgen(js_name = edgeCount)]
    pub fn edge_count(&self) -> u32 {
        self.graph.edge_count() as u32
    }

    /// Look up a node ID by name.
    #[wasm_bindgen(js_name = findNode)]
    pub fn find_node(&self, name: &str) -> Option<u32> {
        self.graph.find_node(name).map(NodeId::raw)
    }

    /// Look up an edge ID by name.
    #[wasm_bindgen(js_name = findEdge)]
    pub fn find_edge(&self, name: &str) -> Option<u32> {
        self.graph.find_edge(name).map(EdgeId::raw)
    }

    // =========================================================================
    // Relaxation
    // =========================================================================

    /// Label all nodes with their minimum cost from `node_id`.
    ///
    /// Returns false if the node is unknown.
    #[wasm_bindgen(js_name = computeDistances)]
    pub fn compute_distances(&mut self, node_id: u32) -> bool {
        match self.graph.node_id(node_id) {
            Some(source) => {
                self.graph.compute_distances(source);
                true
            }
            None => false,
        }
    }

    /// Relax from a random node. Returns its ID, or undefined if empty.
    #[wasm_bindgen(js_name = computeDistancesFromRandom)]
    pub fn compute_distances_from_random(&mut self) -> Option<u32> {
        self.graph.compute_distances_from_random().map(NodeId::raw)
    }

    /// Distance of a node (`Infinity` if unreached).
    #[wasm_bindgen(js_name = getDistance)]
    pub fn get_distance(&self, node_id: u32) -> Option<f32> {
        self.graph.node_id(node_id).map(|id| self.graph.distance(id))
    }

    /// Minimum cost of an edge (`Infinity` if unreached).
    #[wasm_bindgen(js_name = getCost)]
    pub fn get_cost(&self, edge_id: u32) -> Option<f32> {
        self.graph.edge_id(edge_id).map(|id| self.graph.cost(id))
    }

    /// Base cost of an edge divided by its current member count.
    #[wasm_bindgen(js_name = getPerMemberCost)]
    pub fn get_per_member_cost(&self, edge_id: u32) -> Option<f32> {
        self.graph
            .edge_id(edge_id)
            .map(|id| self.graph.per_member_cost(id))
    }

    /// Log every label at debug level.
    #[wasm_bindgen(js_name = dumpLabels)]
    pub fn dump_labels(&self) {
        self.graph.dump_labels();
    }

    /// Node and edge IDs sorted by distance and cost.
    ///
    /// Returns `{ nodes: number[], edges: number[] }`.
    #[wasm_bindgen(js_name = orderedSnapshot)]
    pub fn ordered_snapshot(&mut self) -> Result<JsValue, JsError> {
        let snapshot = self.graph.ordered_snapshot();
        let snapshot = JsSnapshot {
            nodes: snapshot.nodes.into_iter().map(NodeId::raw).collect(),
            edges: snapshot.edges.into_iter().map(EdgeId::raw).collect(),
        };
        Ok(serde_wasm_bindgen::to_value(&snapshot)?)
    }

    // =========================================================================
    // Simulation
    // =========================================================================

    /// Advance the simulation one step.
    pub fn tick(&mut self, dt: f32) {
        self.graph.tick(dt);
    }

    /// Candidate overlapping pairs from the last tick.
    ///
    /// Returns `[{ a: entity, b: entity }, ...]`.
    #[wasm_bindgen(js_name = candidatePairs)]
    pub fn candidate_pairs(&self) -> Result<JsValue, JsError> {
        let pairs: Vec<JsPair> = self
            .graph
            .candidate_pairs()
            .iter()
            .map(|pair| JsPair {
                a: pair.a.into(),
                b: pair.b.into(),
            })
            .collect();
        Ok(serde_wasm_bindgen::to_value(&pairs)?)
    }

    /// Per-slot render data as a Float32Array.
    ///
    /// Five floats per slot: `[x, y, size, kind, label]`, kind 0 for nodes
    /// and 1 for edges, label the distance or cost. Slot numbers are the
    /// node and edge IDs.
    #[wasm_bindgen(js_name = getRenderBuffer)]
    pub fn get_render_buffer(&self) -> Float32Array {
        Float32Array::from(&self.graph.render_buffer()[..])
    }

    /// Get a node's position as [x, y].
    #[wasm_bindgen(js_name = getNodePosition)]
    pub fn get_node_position(&self, node_id: u32) -> Option<Vec<f32>> {
        let body = self.graph.body(self.graph.node_id(node_id)?);
        Some(vec![body.position.x, body.position.y])
    }

    /// Get an edge's position as [x, y].
    #[wasm_bindgen(js_name = getEdgePosition)]
    pub fn get_edge_position(&self, edge_id: u32) -> Option<Vec<f32>> {
        let body = self.graph.body(self.graph.edge_id(edge_id)?);
        Some(vec![body.position.x, body.position.y])
    }

    /// Get a node's bounding box as [min_x, min_y, max_x, max_y].
    #[wasm_bindgen(js_name = getNodeBounds)]
    pub fn get_node_bounds(&self, node_id: u32) -> Option<Vec<f32>> {
        let id = self.graph.node_id(node_id)?;
        Some(bounds(&self.graph, id.into()))
    }

    /// Get an edge's bounding box as [min_x, min_y, max_x, max_y].
    #[wasm_bindgen(js_name = getEdgeBounds)]
    pub fn get_edge_bounds(&self, edge_id: u32) -> Option<Vec<f32>> {
        let id = self.graph.edge_id(edge_id)?;
        Some(bounds(&self.graph, id.into()))
    }

    /// IDs of the edges a node is attached to.
    #[wasm_bindgen(js_name = getNodeEdges)]
    pub fn get_node_edges(&self, node_id: u32) -> Option<Vec<u32>> {
        let id = self.graph.node_id(node_id)?;
        Some(self.graph.node_edges(id).into_iter().map(EdgeId::raw).collect())
    }

    /// IDs of the nodes attached to an edge, for drawing its links.
    #[wasm_bindgen(js_name = getEdgeNodes)]
    pub fn get_edge_nodes(&self, edge_id: u32) -> Option<Vec<u32>> {
        let id = self.graph.edge_id(edge_id)?;
        Some(self.graph.edge_nodes(id).into_iter().map(NodeId::raw).collect())
    }

    /// Get a node's name.
    #[wasm_bindgen(js_name = getNodeName)]
    pub fn get_node_name(&self, node_id: u32) -> Option<String> {
        let id = self.graph.node_id(node_id)?;
        Some(self.graph.name(id).to_owned())
    }

    /// Get an edge's name.
    #[wasm_bindgen(js_name = getEdgeName)]
    pub fn get_edge_name(&self, edge_id: u32) -> Option<String> {
        let id = self.graph.edge_id(edge_id)?;
        Some(self.graph.name(id).to_owned())
    }

    /// Move a node.
    #[wasm_bindgen(js_name = setNodePosition)]
    pub fn set_node_position(&mut self, node_id: u32, x: f32, y: f32) {
        if let Some(id) = self.graph.node_id(node_id) {
            self.graph.set_position(id, x, y);
        }
    }

    /// Resize a node.
    #[wasm_bindgen(js_name = setNodeSize)]
    pub fn set_node_size(&mut self, node_id: u32, size: f32) {
        if let Some(id) = self.graph.node_id(node_id) {
            self.graph.set_size(id, size);
        }
    }

    /// Resize an edge.
    #[wasm_bindgen(js_name = setEdgeSize)]
    pub fn set_edge_size(&mut self, edge_id: u32, size: f32) {
        if let Some(id) = self.graph.edge_id(edge_id) {
            self.graph.set_size(id, size);
        }
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Entities intersecting a drag rectangle, as `[{ kind, id }, ...]`.
    #[wasm_bindgen(js_name = selectInRect)]
    pub fn select_in_rect(
        &mut self,
        x0: f32,
        y0: f32,
        x1: f32,
        y1: f32,
    ) -> Result<JsValue, JsError> {
        let hits: Vec<JsEntity> = self
            .graph
            .pick_in_rect(x0, y0, x1, y1)
            .into_iter()
            .map(JsEntity::from)
            .collect();
        Ok(serde_wasm_bindgen::to_value(&hits)?)
    }

    /// Entity under a click position, as `{ kind, id }` or undefined.
    ///
    /// Selection is reported only; the caller decides what it triggers.
    #[wasm_bindgen(js_name = selectAt)]
    pub fn select_at(&mut self, x: f32, y: f32) -> Result<JsValue, JsError> {
        match self.graph.pick(x, y) {
            Some(entity) => Ok(serde_wasm_bindgen::to_value(&JsEntity::from(entity))?),
            None => Ok(JsValue::UNDEFINED),
        }
    }
}

impl Default for HypergraphWasm {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod integration_tests {
    use super::*;

    /// Two nodes sharing one edge of cost 2.
    #[test]
    fn test_scenario_pair_edge() {
        let mut graph = Hypergraph::new();
        let a = graph.create_node("A");
        let b = graph.create_node("B");
        let e1 = graph.create_edge("e1", 2.0);
        graph.attach(a, e1);
        graph.attach(b, e1);

        assert_eq!(graph.per_member_cost(e1), 1.0);
        graph.compute_distances(a);
        assert_eq!(graph.cost(e1), 1.0);
        assert_eq!(graph.distance(b), 2.0);
    }

    /// Three nodes sharing one edge of cost 9.
    #[test]
    fn test_scenario_triple_edge() {
        let mut graph = Hypergraph::new();
        let a = graph.create_node("A");
        let b = graph.create_node("B");
        let c = graph.create_node("C");
        let e2 = graph.create_edge("e2", 9.0);
        for node in [a, b, c] {
            graph.attach(node, e2);
        }

        assert_eq!(graph.per_member_cost(e2), 3.0);
        graph.compute_distances(a);
        assert_eq!(graph.cost(e2), 3.0);
        assert_eq!(graph.distance(b), 6.0);
        assert_eq!(graph.distance(c), 6.0);
    }

    /// A node without edges never moves.
    #[test]
    fn test_scenario_unlinked_node_at_rest() {
        let mut graph = Hypergraph::new();
        let lonely = graph.create_node("lonely");
        let a = graph.create_node("a");
        let e = graph.create_edge("e", 1.0);
        graph.attach(a, e);

        for _ in 0..10 {
            graph.tick(1.0);
            assert_eq!(graph.body(lonely).velocity, vek::Vec2::zero());
        }
    }

    /// Build a random hypergraph like a test bench would, then relax,
    /// order and tick it.
    #[test]
    fn test_full_pipeline() {
        let config = SimConfig {
            seed: 42,
            ..SimConfig::default()
        };
        let mut graph = Hypergraph::with_config(config).unwrap();

        let nodes: Vec<NodeId> = (0..100)
            .map(|i| graph.create_node(&format!("v{i}")))
            .collect();

        let mut state = 7u64;
        let mut next = move |bound: u64| {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            (state >> 33) % bound
        };
        for i in 0..800 {
            let cost = (next(2) + 1) as f32;
            let kind = if cost < 2.0 { "cat" } else { "tag" };
            let edge = graph.create_edge(&format!("{kind}{i}"), cost);
            for _ in 0..next(8) {
                let node = nodes[next(nodes.len() as u64) as usize];
                graph.attach(node, edge);
            }
        }
        assert_eq!(graph.node_count(), 100);
        assert_eq!(graph.edge_count(), 800);

        let stats = graph.compute_distances(nodes[0]);
        assert!(stats.processed >= 1);
        assert!(stats.enqueued >= stats.processed);
        assert_eq!(graph.distance(nodes[0]), 0.0);

        // Every reached node got there through some edge it belongs to
        for &node in &nodes[1..] {
            let d = graph.distance(node);
            if d.is_finite() {
                let through = graph
                    .node_edges(node)
                    .into_iter()
                    .map(|e| graph.cost(e) + graph.per_member_cost(e))
                    .fold(f32::INFINITY, f32::min);
                assert_eq!(d, through);
            }
        }

        let snapshot = graph.ordered_snapshot();
        assert_eq!(snapshot.nodes.len(), 100);
        assert_eq!(snapshot.edges.len(), 800);
        for pair in snapshot.nodes.windows(2) {
            assert!(graph.distance(pair[0]) <= graph.distance(pair[1]));
        }
        for pair in snapshot.edges.windows(2) {
            assert!(graph.cost(pair[0]) <= graph.cost(pair[1]));
        }

        for _ in 0..3 {
            graph.tick(1.0);
        }
        for pair in graph.overlapping_pairs() {
            assert!(graph.candidate_pairs().contains(&pair));
        }
    }

    #[test]
    fn test_facade_without_js_types() {
        let mut wasm = HypergraphWasm::new();
        let a = wasm.create_node("A");
        let b = wasm.create_node("B");
        let e = wasm.create_edge("e", 2.0);

        assert!(wasm.attach(a, e));
        assert!(wasm.attach(b, e));
        assert!(!wasm.attach(e, a));
        assert!(!wasm.attach(a, 99));

        assert!(wasm.compute_distances(a));
        assert!(!wasm.compute_distances(e));
        assert_eq!(wasm.get_distance(b), Some(2.0));
        assert_eq!(wasm.get_cost(e), Some(1.0));
        assert_eq!(wasm.get_distance(e), None);
        assert_eq!(wasm.get_per_member_cost(e), Some(1.0));
        assert_eq!(wasm.find_node("B"), Some(b));
        assert_eq!(wasm.get_node_name(a).as_deref(), Some("A"));

        wasm.set_node_position(a, 10.0, 10.0);
        wasm.set_node_size(a, 4.0);
        assert_eq!(wasm.get_node_bounds(a), Some(vec![8.0, 8.0, 12.0, 12.0]));
        assert_eq!(wasm.get_node_position(a), Some(vec![10.0, 10.0]));
        assert_eq!(wasm.get_edge_bounds(a), None);

        let mut members = wasm.get_edge_nodes(e).unwrap();
        members.sort_unstable();
        assert_eq!(members, vec![a, b]);
        assert_eq!(wasm.get_node_edges(b), Some(vec![e]));
        assert_eq!(wasm.get_edge_nodes(a), None);
        wasm.dump_labels();
    }
}
