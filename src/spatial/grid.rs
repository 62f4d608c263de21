//! Uniform grid broad phase.
//!
//! Every entity is bucketed into each cell its bounding box touches, then
//! every pair sharing a cell becomes a collision candidate. The grid is
//! cleared and refilled every tick, so it carries no state across motion.
//!
//! Cell coordinates are clamped to the grid, so entities that drift outside
//! the world fold into the border cells instead of indexing out of bounds.
//! Clamping is monotone, so two overlapping boxes always share a cell.

use std::collections::HashSet;

use vek::Aabr;

use crate::config::SimConfig;
use crate::graph::EntityId;

/// Candidate pair from the broad phase.
///
/// Entities are possibly overlapping; an exact test must confirm it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CandidatePair {
    /// Entity inserted first.
    pub a: EntityId,
    /// Entity inserted second.
    pub b: EntityId,
}

/// Fixed-size grid of buckets covering the world rectangle.
pub struct UniformGrid {
    cell_size: f32,
    cols: usize,
    rows: usize,
    buckets: Vec<Vec<EntityId>>,
}

impl UniformGrid {
    /// Create an empty grid for the configured world.
    ///
    /// The config must have passed `SimConfig::validate`.
    pub fn new(config: &SimConfig) -> Self {
        let (cols, rows) = config.grid_dims();
        Self {
            cell_size: config.cell_size,
            cols,
            rows,
            buckets: vec![Vec::new(); cols * rows],
        }
    }

    /// Map a world coordinate to a clamped cell coordinate.
    #[inline]
    fn cell_coord(&self, v: f32, count: usize) -> usize {
        // float-to-int casts saturate, and NaN maps to 0
        ((v / self.cell_size).floor().max(0.0) as usize).min(count - 1)
    }

    /// Cell (column, row) containing a world point.
    pub fn cell_of(&self, x: f32, y: f32) -> (usize, usize) {
        (self.cell_coord(x, self.cols), self.cell_coord(y, self.rows))
    }

    /// Insert an entity into every cell its bounding box touches.
    pub fn insert(&mut self, id: EntityId, bbox: Aabr<f32>) {
        let (c0, r0) = self.cell_of(bbox.min.x, bbox.min.y);
        let (c1, r1) = self.cell_of(bbox.max.x, bbox.max.y);
        for row in r0..=r1 {
            for col in c0..=c1 {
                self.buckets[row * self.cols + col].push(id);
            }
        }
    }

    /// Number of cells holding at least one entity.
    pub fn occupied_cells(&self) -> usize {
        self.buckets.iter().filter(|b| !b.is_empty()).count()
    }

    /// All unordered pairs sharing a cell, each reported once.
    ///
    /// Pairs come out in row-major cell order, then insertion order within
    /// the cell.
    pub fn candidate_pairs(&self) -> Vec<CandidatePair> {
        let mut seen = HashSet::new();
        let mut pairs = Vec::new();
        for bucket in &self.buckets {
            for (i, &a) in bucket.iter().enumerate() {
                for &b in &bucket[i + 1..] {
                    if seen.insert((a, b)) {
                        pairs.push(CandidatePair { a, b });
                    }
                }
            }
        }
        pairs
    }

    /// Empty every bucket, keeping their allocations.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Hypergraph;
    use vek::Vec2;

    fn aabr(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Aabr<f32> {
        Aabr {
            min: Vec2::new(min_x, min_y),
            max: Vec2::new(max_x, max_y),
        }
    }

    fn grid() -> UniformGrid {
        UniformGrid::new(&SimConfig {
            world_width: 100.0,
            world_height: 100.0,
            cell_size: 10.0,
            ..SimConfig::default()
        })
    }

    fn bucket(grid: &UniformGrid, col: usize, row: usize) -> &[EntityId] {
        &grid.buckets[row * grid.cols + col]
    }

    fn ids(count: usize) -> Vec<EntityId> {
        let mut graph = Hypergraph::new();
        (0..count)
            .map(|i| graph.create_node(&format!("n{i}")).into())
            .collect()
    }

    #[test]
    fn test_dims() {
        let grid = grid();
        assert_eq!((grid.cols, grid.rows), (10, 10));
        assert_eq!(grid.buckets.len(), 100);
    }

    #[test]
    fn test_cell_of_clamps() {
        let grid = grid();
        assert_eq!(grid.cell_of(5.0, 15.0), (0, 1));
        assert_eq!(grid.cell_of(-50.0, -0.5), (0, 0));
        assert_eq!(grid.cell_of(1e9, 100.0), (9, 9));
        assert_eq!(grid.cell_of(f32::NAN, 55.0), (0, 5));
    }

    #[test]
    fn test_insert_straddling_box_hits_four_cells() {
        let mut grid = grid();
        let id = ids(1)[0];
        grid.insert(id, aabr(8.0, 8.0, 12.0, 12.0));

        for (col, row) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            assert_eq!(bucket(&grid, col, row), &[id]);
        }
        assert_eq!(grid.occupied_cells(), 4);
    }

    #[test]
    fn test_insert_interior_box_hits_one_cell() {
        let mut grid = grid();
        let id = ids(1)[0];
        grid.insert(id, aabr(21.0, 31.0, 29.0, 39.0));
        assert_eq!(bucket(&grid, 2, 3), &[id]);
        assert_eq!(grid.occupied_cells(), 1);
    }

    #[test]
    fn test_pairs_deduplicated_across_cells() {
        let mut grid = grid();
        let ids = ids(2);
        // Both boxes straddle the same four cells
        grid.insert(ids[0], aabr(8.0, 8.0, 12.0, 12.0));
        grid.insert(ids[1], aabr(9.0, 9.0, 11.0, 11.0));

        let pairs = grid.candidate_pairs();
        assert_eq!(pairs, vec![CandidatePair { a: ids[0], b: ids[1] }]);
    }

    #[test]
    fn test_distant_entities_not_paired() {
        let mut grid = grid();
        let ids = ids(3);
        grid.insert(ids[0], aabr(1.0, 1.0, 3.0, 3.0));
        grid.insert(ids[1], aabr(2.0, 2.0, 4.0, 4.0));
        grid.insert(ids[2], aabr(81.0, 81.0, 83.0, 83.0));

        let pairs = grid.candidate_pairs();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0], CandidatePair { a: ids[0], b: ids[1] });
    }

    #[test]
    fn test_large_box_spans_interior_cells() {
        let mut grid = grid();
        let ids = ids(2);
        // Larger than a cell: the small box sits in a cell none of the big
        // box's corners fall in
        grid.insert(ids[0], aabr(5.0, 5.0, 35.0, 35.0));
        grid.insert(ids[1], aabr(21.0, 21.0, 22.0, 22.0));

        assert_eq!(grid.candidate_pairs().len(), 1);
    }

    #[test]
    fn test_out_of_world_entities_clamped() {
        let mut grid = grid();
        let ids = ids(2);
        grid.insert(ids[0], aabr(-40.0, -40.0, -30.0, -30.0));
        grid.insert(ids[1], aabr(-35.0, -35.0, -25.0, -25.0));

        assert_eq!(bucket(&grid, 0, 0).len(), 2);
        assert_eq!(grid.candidate_pairs().len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut grid = grid();
        let ids = ids(2);
        grid.insert(ids[0], aabr(1.0, 1.0, 3.0, 3.0));
        grid.insert(ids[1], aabr(2.0, 2.0, 4.0, 4.0));

        grid.clear();
        assert_eq!(grid.occupied_cells(), 0);
        assert!(grid.candidate_pairs().is_empty());
    }
}
