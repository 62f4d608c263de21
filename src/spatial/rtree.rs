//! R-tree based pick index using the rstar crate.
//!
//! Answers "which entity is under this point" for click/selection handling,
//! using the entity bounding boxes from the last rebuild.

use std::cmp::Ordering;

use rstar::{RTree, RTreeObject, AABB};
use vek::Aabr;

use crate::graph::EntityId;

/// An entity bounding box stored in the tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityBox {
    /// The entity handle.
    pub id: EntityId,
    /// Bounding box at the time of the rebuild.
    pub aabr: Aabr<f32>,
}

impl EntityBox {
    /// Create a new EntityBox.
    pub fn new(id: EntityId, aabr: Aabr<f32>) -> Self {
        Self { id, aabr }
    }

    /// Whether every corner is a finite coordinate.
    pub fn is_finite(&self) -> bool {
        self.aabr.min.x.is_finite()
            && self.aabr.min.y.is_finite()
            && self.aabr.max.x.is_finite()
            && self.aabr.max.y.is_finite()
    }

    fn area(&self) -> f32 {
        let extent = self.aabr.max - self.aabr.min;
        extent.x * extent.y
    }
}

impl RTreeObject for EntityBox {
    type Envelope = AABB<[f32; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [self.aabr.min.x, self.aabr.min.y],
            [self.aabr.max.x, self.aabr.max.y],
        )
    }
}

/// Nodes before edges, then the smaller box.
fn pick_order(a: &EntityBox, b: &EntityBox) -> Ordering {
    b.id.is_node()
        .cmp(&a.id.is_node())
        .then_with(|| a.area().total_cmp(&b.area()))
}

/// Hit-test index over entity bounding boxes.
pub struct PickIndex {
    tree: RTree<EntityBox>,
}

impl PickIndex {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Rebuild the index from the current boxes.
    ///
    /// Boxes with a non-finite corner (an entity that diverged) cannot be
    /// ordered by the bulk loader and are left out, so they are never picked.
    pub fn rebuild(&mut self, boxes: Vec<EntityBox>) {
        let boxes: Vec<EntityBox> = boxes.into_iter().filter(EntityBox::is_finite).collect();
        self.tree = RTree::bulk_load(boxes);
    }

    /// Entity whose bounding box contains the point.
    ///
    /// When several do, nodes win over edges, then the smallest box wins.
    pub fn pick(&self, x: f32, y: f32) -> Option<EntityId> {
        self.tree
            .locate_in_envelope_intersecting(&AABB::from_point([x, y]))
            .min_by(|a, b| pick_order(a, b))
            .map(|hit| hit.id)
    }

    /// All entities whose bounding boxes intersect a rectangle.
    pub fn in_rect(&self, min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Vec<EntityId> {
        let envelope = AABB::from_corners([min_x, min_y], [max_x, max_y]);
        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|hit| hit.id)
            .collect()
    }
}

impl Default for PickIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Hypergraph;
    use vek::Vec2;

    fn square(x: f32, y: f32, half: f32) -> Aabr<f32> {
        Aabr {
            min: Vec2::new(x - half, y - half),
            max: Vec2::new(x + half, y + half),
        }
    }

    #[test]
    fn test_pick_hit_and_miss() {
        let mut graph = Hypergraph::new();
        let a: EntityId = graph.create_node("a").into();
        let b: EntityId = graph.create_node("b").into();

        let mut index = PickIndex::new();
        index.rebuild(vec![
            EntityBox::new(a, square(0.0, 0.0, 5.0)),
            EntityBox::new(b, square(20.0, 0.0, 5.0)),
        ]);

        assert_eq!(index.pick(1.0, 1.0), Some(a));
        assert_eq!(index.pick(19.0, -2.0), Some(b));
        assert_eq!(index.pick(10.0, 0.0), None);
    }

    #[test]
    fn test_pick_prefers_nodes_then_small() {
        let mut graph = Hypergraph::new();
        let edge: EntityId = graph.create_edge("e", 1.0).into();
        let big: EntityId = graph.create_node("big").into();
        let small: EntityId = graph.create_node("small").into();

        let mut index = PickIndex::new();
        index.rebuild(vec![EntityBox::new(edge, square(0.0, 0.0, 2.0))]);
        assert_eq!(index.pick(0.0, 0.0), Some(edge));

        index.rebuild(vec![
            EntityBox::new(edge, square(0.0, 0.0, 2.0)),
            EntityBox::new(big, square(0.0, 0.0, 10.0)),
            EntityBox::new(small, square(0.0, 0.0, 4.0)),
        ]);
        assert_eq!(index.pick(0.0, 0.0), Some(small));
        assert_eq!(index.pick(6.0, 6.0), Some(big));
    }

    #[test]
    fn test_in_rect() {
        let mut graph = Hypergraph::new();
        let a: EntityId = graph.create_node("a").into();
        let b: EntityId = graph.create_node("b").into();
        let c: EntityId = graph.create_node("c").into();

        let mut index = PickIndex::new();
        index.rebuild(vec![
            EntityBox::new(a, square(0.0, 0.0, 1.0)),
            EntityBox::new(b, square(5.0, 5.0, 1.0)),
            EntityBox::new(c, square(10.0, 10.0, 1.0)),
        ]);

        let hits = index.in_rect(-1.0, -1.0, 6.0, 6.0);
        assert_eq!(hits.len(), 2);
        assert!(hits.contains(&a));
        assert!(hits.contains(&b));
    }

    #[test]
    fn test_rebuild_skips_non_finite_boxes() {
        let mut graph = Hypergraph::new();
        let a: EntityId = graph.create_node("a").into();
        let lost: EntityId = graph.create_node("lost").into();
        let gone: EntityId = graph.create_node("gone").into();

        let mut index = PickIndex::new();
        index.rebuild(vec![
            EntityBox::new(a, square(0.0, 0.0, 1.0)),
            EntityBox::new(lost, square(f32::NAN, 0.0, 1.0)),
            EntityBox::new(gone, square(f32::INFINITY, f32::NEG_INFINITY, 1.0)),
        ]);

        assert_eq!(index.pick(0.0, 0.0), Some(a));
        assert_eq!(index.in_rect(-1e30, -1e30, 1e30, 1e30), vec![a]);
    }
}
