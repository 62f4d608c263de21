//! Physical state shared by nodes and edges.
//!
//! Both kinds of entity live in the same arena and take part in the same
//! simulation. Each one has:
//! - A position and velocity in world space
//! - A size (side length of its square bounding box)
//! - A name, unique within its own kind

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use petgraph::stable_graph::NodeIndex;
use vek::{Aabr, Vec2};

use super::edge::{EdgeCost, EdgeId};
use super::node::{NodeId, NodeLabel};

static NEXT_GRAPH_TAG: AtomicU32 = AtomicU32::new(0);

/// Identifies the `Hypergraph` a handle was issued by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GraphTag(u32);

impl GraphTag {
    /// Allocate a process-unique tag.
    pub(crate) fn next() -> Self {
        Self(NEXT_GRAPH_TAG.fetch_add(1, Ordering::Relaxed))
    }
}

/// Position, velocity and size of an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub position: Vec2<f32>,
    pub velocity: Vec2<f32>,
    pub size: f32,
}

impl Body {
    /// Create a body at rest.
    pub fn new(position: Vec2<f32>, size: f32) -> Self {
        Self {
            position,
            velocity: Vec2::zero(),
            size,
        }
    }

    /// Half the size; the radius used by the attraction rule.
    #[inline]
    pub fn radius(&self) -> f32 {
        self.size / 2.0
    }

    /// Square bounding box centered on the position.
    pub fn bounding_box(&self) -> Aabr<f32> {
        let half = Vec2::broadcast(self.radius());
        Aabr {
            min: self.position - half,
            max: self.position + half,
        }
    }
}

/// Handle to either kind of entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityId {
    Node(NodeId),
    Edge(EdgeId),
}

impl EntityId {
    pub(crate) fn tag(self) -> GraphTag {
        match self {
            EntityId::Node(id) => id.tag,
            EntityId::Edge(id) => id.tag,
        }
    }

    pub(crate) fn index(self) -> NodeIndex {
        match self {
            EntityId::Node(id) => id.index(),
            EntityId::Edge(id) => id.index(),
        }
    }

    /// Whether this handle refers to a node.
    pub fn is_node(self) -> bool {
        matches!(self, EntityId::Node(_))
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Node(id) => fmt::Display::fmt(id, f),
            EntityId::Edge(id) => fmt::Display::fmt(id, f),
        }
    }
}

impl From<NodeId> for EntityId {
    fn from(id: NodeId) -> Self {
        EntityId::Node(id)
    }
}

impl From<EdgeId> for EntityId {
    fn from(id: EdgeId) -> Self {
        EntityId::Edge(id)
    }
}

/// Kind-specific state of an arena slot.
#[derive(Debug, Clone)]
pub(crate) enum VertexKind {
    Node(NodeLabel),
    Edge(EdgeCost),
}

/// One arena slot: a node or an edge of the hypergraph.
#[derive(Debug, Clone)]
pub(crate) struct Vertex {
    pub name: String,
    pub body: Body,
    pub kind: VertexKind,
}

impl Vertex {
    /// Build the typed handle for this slot.
    pub fn entity_id(&self, tag: GraphTag, index: NodeIndex) -> EntityId {
        match self.kind {
            VertexKind::Node(_) => EntityId::Node(NodeId::new(tag, index)),
            VertexKind::Edge(_) => EntityId::Edge(EdgeId::new(tag, index)),
        }
    }
}
