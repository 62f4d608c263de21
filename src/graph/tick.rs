//! Per-tick simulation: kinematics, broad phase, pick index.
//!
//! A tick runs in a fixed order:
//! 1. Velocities for every entity from the positions at tick start
//! 2. Explicit Euler step for every entity
//! 3. Grid cleared and refilled from the new bounding boxes
//! 4. Candidate pairs enumerated from the filled grid
//! 5. Pick index rebuilt

use petgraph::stable_graph::NodeIndex;
use tracing::trace;
use vek::Vec2;

use super::engine::Hypergraph;
use super::entity::EntityId;
use crate::layout::kinematics;
use crate::spatial::{CandidatePair, EntityBox};

impl Hypergraph {
    /// Advance the simulation by one step of length `dt`.
    ///
    /// `dt = 1.0` is the plain unscaled step. Relaxation labels are not
    /// touched.
    pub fn tick(&mut self, dt: f32) {
        let arena = &self.arena;
        let velocities: Vec<(NodeIndex, Vec2<f32>)> = arena
            .node_indices()
            .map(|index| {
                let neighbors = arena.neighbors(index).map(|n| &arena[n].body);
                (index, kinematics::attraction(&arena[index].body, neighbors))
            })
            .collect();

        for (index, velocity) in velocities {
            let body = &mut self.arena[index].body;
            body.velocity = velocity;
            kinematics::integrate(body, dt);
        }

        self.grid.clear();
        for index in self.arena.node_indices() {
            let vertex = &self.arena[index];
            self.grid
                .insert(vertex.entity_id(self.tag, index), vertex.body.bounding_box());
        }
        self.candidates = self.grid.candidate_pairs();

        self.rebuild_pick_index();

        trace!(
            candidates = self.candidates.len(),
            occupied_cells = self.grid.occupied_cells(),
            "tick complete"
        );
    }

    /// Broad-phase pairs from the most recent tick.
    pub fn candidate_pairs(&self) -> &[CandidatePair] {
        &self.candidates
    }

    /// Candidates whose bounding boxes actually intersect.
    pub fn overlapping_pairs(&self) -> Vec<CandidatePair> {
        self.candidates
            .iter()
            .filter(|pair| {
                self.bounding_box(pair.a)
                    .collides_with_aabr(self.bounding_box(pair.b))
            })
            .copied()
            .collect()
    }

    /// Entity under a point, for click handling.
    pub fn pick(&mut self, x: f32, y: f32) -> Option<EntityId> {
        if self.pick_dirty {
            self.rebuild_pick_index();
        }
        self.picker.pick(x, y)
    }

    /// Entities whose bounding boxes intersect a rectangle, for drag
    /// selection. Corners may be given in either order.
    pub fn pick_in_rect(&mut self, x0: f32, y0: f32, x1: f32, y1: f32) -> Vec<EntityId> {
        if self.pick_dirty {
            self.rebuild_pick_index();
        }
        self.picker.in_rect(x0, y0, x1, y1)
    }

    /// Rebuild the pick index from the current bounding boxes.
    pub fn rebuild_pick_index(&mut self) {
        let boxes = self
            .arena
            .node_indices()
            .map(|index| {
                let vertex = &self.arena[index];
                EntityBox::new(vertex.entity_id(self.tag, index), vertex.body.bounding_box())
            })
            .collect();
        self.picker.rebuild(boxes);
        self.pick_dirty = false;
    }
}
