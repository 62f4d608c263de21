//! Spatial indexing.
//!
//! - `grid`: uniform grid broad phase, rebuilt every tick, producing
//!   candidate overlapping pairs
//! - `rtree`: R-tree over bounding boxes for point picking

mod grid;
mod rtree;

pub use grid::{CandidatePair, UniformGrid};
pub use rtree::{EntityBox, PickIndex};
