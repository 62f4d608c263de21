//! Hypergraph data structures and operations.
//!
//! Nodes and hyperedges share one petgraph `StableGraph` arena, so handles
//! are stable indices and the node/edge cross references are arena links
//! rather than pointers. The `Hypergraph` is the only owner of entities.

mod edge;
mod engine;
mod entity;
mod node;
mod order;
mod relax;
mod tick;

pub use edge::{EdgeCost, EdgeId};
pub use engine::{Hypergraph, RENDER_STRIDE};
pub use entity::{Body, EntityId, GraphTag};
pub use node::{NodeId, NodeLabel};
pub use order::{Labels, Snapshot};
pub use relax::RelaxStats;
