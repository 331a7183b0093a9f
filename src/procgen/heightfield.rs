/// Immutable terrain heightfield
use super::grid::TerrainGrid;
use serde::{Deserialize, Serialize};

/// Grid of elevation samples, one per terrain vertex
///
/// Heights are stored row-major (`heights[row * (segments + 1) + col]`), the
/// same order as [`TerrainGrid::index`]. There are no mutators: a heightfield
/// is produced once by the generator and only read afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heightfield {
    grid: TerrainGrid,
    seed: u32,
    heights: Vec<f32>,
}

impl Heightfield {
    pub(crate) fn from_samples(grid: TerrainGrid, seed: u32, heights: Vec<f32>) -> Self {
        debug_assert_eq!(heights.len(), grid.vertex_count());
        Self { grid, seed, heights }
    }

    pub fn grid(&self) -> TerrainGrid {
        self.grid
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// All samples in row-major order
    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    /// Sample at grid vertex `(col, row)`
    pub fn get(&self, col: usize, row: usize) -> Option<f32> {
        let side = self.grid.vertices_per_side();
        if col >= side || row >= side {
            return None;
        }
        self.at_index(self.grid.index(col, row))
    }

    /// Sample by linear vertex index
    pub fn at_index(&self, index: usize) -> Option<f32> {
        self.heights.get(index).copied()
    }

    /// Sample of the grid cell containing world `(x, z)`, no interpolation
    pub fn height_at_cell(&self, x: f32, z: f32) -> Option<f32> {
        self.grid.index_at(x, z).and_then(|i| self.at_index(i))
    }

    /// Height at world coordinates using bilinear interpolation
    ///
    /// Returns 0.0 outside the grid.
    pub fn sample(&self, x: f32, z: f32) -> f32 {
        let cell = self.grid.cell_size();
        let grid_x = (x + self.grid.half_size()) / cell;
        let grid_z = (z + self.grid.half_size()) / cell;
        let last = self.grid.segments as f32;

        if !(0.0..=last).contains(&grid_x) || !(0.0..=last).contains(&grid_z) {
            return 0.0;
        }

        let x0 = (grid_x.floor() as usize).min(self.grid.segments);
        let z0 = (grid_z.floor() as usize).min(self.grid.segments);
        let x1 = (x0 + 1).min(self.grid.segments);
        let z1 = (z0 + 1).min(self.grid.segments);

        let fx = grid_x - x0 as f32;
        let fz = grid_z - z0 as f32;

        let h00 = self.get(x0, z0).unwrap_or(0.0);
        let h10 = self.get(x1, z0).unwrap_or(0.0);
        let h01 = self.get(x0, z1).unwrap_or(0.0);
        let h11 = self.get(x1, z1).unwrap_or(0.0);

        let h0 = h00 * (1.0 - fx) + h10 * fx;
        let h1 = h01 * (1.0 - fx) + h11 * fx;

        h0 * (1.0 - fz) + h1 * fz
    }

    /// Lowest and highest sample
    pub fn height_range(&self) -> (f32, f32) {
        self.heights
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), &h| (lo.min(h), hi.max(h)))
    }
}
