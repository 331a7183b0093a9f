/// Shared coordinate <-> index mapping for the terrain grid
///
/// The heightfield generator, the terrain mesh builder and the decoration
/// placer all go through these functions, so a vertex index always refers
/// to the same world position no matter which of them computed it.
use serde::{Deserialize, Serialize};

/// Square terrain grid centred on the world origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainGrid {
    /// Edge length of the terrain in world units
    pub size: f32,
    /// Number of cells along each axis
    pub segments: usize,
}

impl TerrainGrid {
    pub fn new(size: f32, segments: usize) -> Self {
        Self { size, segments }
    }

    /// Vertices per axis (`segments + 1`)
    pub fn vertices_per_side(&self) -> usize {
        self.segments + 1
    }

    /// Total vertex count of the grid
    pub fn vertex_count(&self) -> usize {
        self.vertices_per_side() * self.vertices_per_side()
    }

    /// Size of one grid cell in world units
    pub fn cell_size(&self) -> f32 {
        self.size / self.segments as f32
    }

    pub fn half_size(&self) -> f32 {
        self.size / 2.0
    }

    /// Row-major linear index of vertex `(col, row)`
    pub fn index(&self, col: usize, row: usize) -> usize {
        row * self.vertices_per_side() + col
    }

    /// Inverse of [`TerrainGrid::index`]
    pub fn col_row(&self, index: usize) -> (usize, usize) {
        let side = self.vertices_per_side();
        (index % side, index / side)
    }

    /// World `(x, z)` of vertex `(col, row)`
    pub fn vertex_position(&self, col: usize, row: usize) -> (f32, f32) {
        let cell = self.cell_size();
        (
            -self.half_size() + col as f32 * cell,
            -self.half_size() + row as f32 * cell,
        )
    }

    /// Grid cell containing world `(x, z)`, floored towards the origin corner.
    ///
    /// Returns `None` when the position lies outside the vertex grid.
    pub fn cell_at(&self, x: f32, z: f32) -> Option<(usize, usize)> {
        let col = ((x + self.half_size()) / self.size * self.segments as f32).floor();
        let row = ((z + self.half_size()) / self.size * self.segments as f32).floor();

        if !col.is_finite() || !row.is_finite() || col < 0.0 || row < 0.0 {
            return None;
        }

        let (col, row) = (col as usize, row as usize);
        if col > self.segments || row > self.segments {
            return None;
        }
        Some((col, row))
    }

    /// Linear vertex index for world `(x, z)`, `None` outside the grid
    pub fn index_at(&self, x: f32, z: f32) -> Option<usize> {
        self.cell_at(x, z).map(|(col, row)| self.index(col, row))
    }
}
