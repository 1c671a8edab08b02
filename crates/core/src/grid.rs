//! Spatial hash grid for neighbor search.
//!
//! Space is partitioned into uniform cells of side `cell_size`; each
//! particle lands in the cell `(i, j, k) = floor(position / cell_size)`.
//! With `cell_size` equal to the smoothing length, every particle within
//! the support radius of a query point is guaranteed to lie in the 3x3x3
//! block of cells around the query's cell, turning the O(N^2) all-pairs
//! search into an O(N) sweep at typical packing densities.
//!
//! The grid is rebuilt from scratch every step since particles move.

use std::collections::HashMap;

use serde::Serialize;

/// Integer cell coordinate.
type Cell = (i32, i32, i32);

/// Uniform spatial hash grid mapping cells to particle indices.
#[derive(Debug)]
pub struct SpatialHashGrid {
    cell_size: f32,
    cells: HashMap<Cell, Vec<u32>>,
}

/// Read-only occupancy statistics, for performance tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridStats {
    /// Number of occupied cells.
    pub num_cells: usize,
    /// Number of particles indexed by the grid.
    pub num_particles: usize,
    /// Mean particle count over occupied cells.
    pub avg_particles_per_cell: f32,
    /// Largest particle count in any single cell.
    pub max_particles_per_cell: usize,
}

impl SpatialHashGrid {
    /// Create an empty grid with the given cell size (must be positive).
    ///
    /// Use the smoothing length `h` as the cell size so that radius-`h`
    /// queries only ever need the 27-cell neighborhood.
    pub fn new(cell_size: f32) -> Self {
        assert!(cell_size > 0.0, "cell_size must be positive");
        Self {
            cell_size,
            cells: HashMap::new(),
        }
    }

    /// Cell size this grid was built with.
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Cell coordinate containing a position.
    #[inline]
    pub fn cell_of(&self, px: f32, py: f32, pz: f32) -> Cell {
        (
            (px / self.cell_size).floor() as i32,
            (py / self.cell_size).floor() as i32,
            (pz / self.cell_size).floor() as i32,
        )
    }

    /// Discard prior state and re-index every particle by its current cell.
    ///
    /// The three slices are the parallel position component arrays; after
    /// this call each particle index appears in exactly one cell.
    pub fn rebuild(&mut self, x: &[f32], y: &[f32], z: &[f32]) {
        debug_assert_eq!(x.len(), y.len());
        debug_assert_eq!(x.len(), z.len());
        self.cells.clear();
        for i in 0..x.len() {
            let cell = self.cell_of(x[i], y[i], z[i]);
            self.cells.entry(cell).or_default().push(i as u32);
        }
        tracing::trace!(
            particles = x.len(),
            cells = self.cells.len(),
            "grid rebuilt"
        );
    }

    /// Invoke `f` with the index of every particle within `radius` of the
    /// query position, the particle at the query position included.
    ///
    /// Enumerates the 27 cells around the query's cell and filters by exact
    /// Euclidean distance, so the callback never sees a false positive.
    /// `radius` must not exceed the cell size or neighbors can be missed.
    pub fn for_each_neighbor<F>(
        &self,
        px: f32,
        py: f32,
        pz: f32,
        radius: f32,
        x: &[f32],
        y: &[f32],
        z: &[f32],
        mut f: F,
    ) where
        F: FnMut(usize),
    {
        debug_assert!(radius <= self.cell_size + f32::EPSILON);
        let (ci, cj, ck) = self.cell_of(px, py, pz);
        let radius_sq = radius * radius;

        for di in -1..=1 {
            for dj in -1..=1 {
                for dk in -1..=1 {
                    let Some(bucket) = self.cells.get(&(ci + di, cj + dj, ck + dk)) else {
                        continue;
                    };
                    for &j in bucket {
                        let j = j as usize;
                        let dx = px - x[j];
                        let dy = py - y[j];
                        let dz = pz - z[j];
                        if dx * dx + dy * dy + dz * dz <= radius_sq {
                            f(j);
                        }
                    }
                }
            }
        }
    }

    /// Collect the indices of all particles within `radius` of a position.
    ///
    /// Convenience wrapper around [`Self::for_each_neighbor`] for callers
    /// that want an owned list (diagnostics, tests).
    pub fn query_neighbors(
        &self,
        position: [f32; 3],
        radius: f32,
        x: &[f32],
        y: &[f32],
        z: &[f32],
    ) -> Vec<usize> {
        let mut out = Vec::new();
        self.for_each_neighbor(position[0], position[1], position[2], radius, x, y, z, |j| {
            out.push(j)
        });
        out
    }

    /// Occupancy statistics over the currently indexed particles.
    pub fn stats(&self) -> GridStats {
        if self.cells.is_empty() {
            return GridStats {
                num_cells: 0,
                num_particles: 0,
                avg_particles_per_cell: 0.0,
                max_particles_per_cell: 0,
            };
        }
        let num_cells = self.cells.len();
        let num_particles: usize = self.cells.values().map(Vec::len).sum();
        let max_particles_per_cell = self.cells.values().map(Vec::len).max().unwrap_or(0);
        GridStats {
            num_cells,
            num_particles,
            avg_particles_per_cell: num_particles as f32 / num_cells as f32,
            max_particles_per_cell,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_of_floors_negative_coordinates() {
        let grid = SpatialHashGrid::new(0.5);
        assert_eq!(grid.cell_of(0.25, 0.75, 1.25), (0, 1, 2));
        assert_eq!(grid.cell_of(-0.25, -0.75, 0.0), (-1, -2, 0));
    }

    #[test]
    fn query_includes_self_position() {
        let mut grid = SpatialHashGrid::new(0.2);
        let x = [0.5];
        let y = [0.5];
        let z = [0.5];
        grid.rebuild(&x, &y, &z);
        let neighbors = grid.query_neighbors([0.5, 0.5, 0.5], 0.2, &x, &y, &z);
        assert_eq!(neighbors, vec![0]);
    }

    #[test]
    fn distance_filter_rejects_same_cell_outliers() {
        // Both particles share a cell, but only one is inside the radius.
        let mut grid = SpatialHashGrid::new(0.5);
        let x = [0.05, 0.45];
        let y = [0.05, 0.45];
        let z = [0.05, 0.45];
        grid.rebuild(&x, &y, &z);
        let neighbors = grid.query_neighbors([0.05, 0.05, 0.05], 0.2, &x, &y, &z);
        assert_eq!(neighbors, vec![0]);
    }

    #[test]
    fn finds_neighbors_across_cell_boundary() {
        let cell = 0.2;
        let mut grid = SpatialHashGrid::new(cell);
        // Adjacent cells, within radius of each other.
        let x = [0.19, 0.21];
        let y = [0.5, 0.5];
        let z = [0.5, 0.5];
        grid.rebuild(&x, &y, &z);
        let mut neighbors = grid.query_neighbors([0.19, 0.5, 0.5], cell, &x, &y, &z);
        neighbors.sort_unstable();
        assert_eq!(neighbors, vec![0, 1]);
    }

    #[test]
    fn far_particles_are_not_neighbors() {
        let mut grid = SpatialHashGrid::new(0.2);
        let x = [0.1, 0.9];
        let y = [0.1, 0.9];
        let z = [0.1, 0.9];
        grid.rebuild(&x, &y, &z);
        let neighbors = grid.query_neighbors([0.1, 0.1, 0.1], 0.2, &x, &y, &z);
        assert_eq!(neighbors, vec![0]);
    }

    #[test]
    fn rebuild_discards_previous_state() {
        let mut grid = SpatialHashGrid::new(0.2);
        let x = [0.1, 0.9];
        let y = [0.1, 0.9];
        let z = [0.1, 0.9];
        grid.rebuild(&x, &y, &z);
        // Move everything, rebuild, and make sure the old cells are gone.
        let x2 = [0.5, 0.5];
        let y2 = [0.5, 0.52];
        let z2 = [0.5, 0.5];
        grid.rebuild(&x2, &y2, &z2);
        let mut neighbors = grid.query_neighbors([0.5, 0.5, 0.5], 0.2, &x2, &y2, &z2);
        neighbors.sort_unstable();
        assert_eq!(neighbors, vec![0, 1]);
        assert_eq!(grid.stats().num_particles, 2);
    }

    #[test]
    fn stats_on_empty_grid() {
        let grid = SpatialHashGrid::new(0.1);
        let stats = grid.stats();
        assert_eq!(stats.num_cells, 0);
        assert_eq!(stats.num_particles, 0);
        assert_eq!(stats.avg_particles_per_cell, 0.0);
    }

    #[test]
    fn stats_count_occupancy() {
        let mut grid = SpatialHashGrid::new(1.0);
        // Three particles in one cell, one in another.
        let x = [0.1, 0.2, 0.3, 5.5];
        let y = [0.1, 0.2, 0.3, 5.5];
        let z = [0.1, 0.2, 0.3, 5.5];
        grid.rebuild(&x, &y, &z);
        let stats = grid.stats();
        assert_eq!(stats.num_cells, 2);
        assert_eq!(stats.num_particles, 4);
        assert_eq!(stats.max_particles_per_cell, 3);
        assert!((stats.avg_particles_per_cell - 2.0).abs() < 1.0e-6);
    }
}
