use crate::procgen::{Heightfield, TerrainGrid};
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Renderable terrain surface
///
/// `vertices[i]` is grid vertex `i` of the heightfield it was built from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainSurface {
    pub vertices: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub indices: Vec<u32>,
    pub color: [f32; 3],
}

impl TerrainSurface {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Rotate a construction-space point so the plane lies horizontal.
///
/// The plane is built in x/y with elevation along +z; a -90° turn about x
/// maps that to x/z with elevation along +y.
fn to_horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, v.z, -v.y)
}

pub struct TerrainMeshBuilder;

impl TerrainMeshBuilder {
    /// Build the terrain surface for `heightfield`.
    ///
    /// Lays out a flat subdivided plane, lifts every vertex to the heightfield
    /// sample with the same index, turns the plane horizontal and recomputes
    /// smooth normals from the displaced positions.
    pub fn build(heightfield: &Heightfield, color: [f32; 3]) -> TerrainSurface {
        let grid = heightfield.grid();
        let (mut vertices, uvs) = Self::flat_plane(grid);

        for (i, vertex) in vertices.iter_mut().enumerate() {
            vertex.z = heightfield.at_index(i).unwrap_or(0.0);
            *vertex = to_horizontal(*vertex);
        }

        let indices = Self::plane_indices(grid);
        let normals = Self::compute_smooth_normals(&vertices, &indices);

        TerrainSurface {
            vertices,
            normals,
            uvs,
            indices,
            color,
        }
    }

    /// Plane vertices in construction space, rows running from +y to -y
    fn flat_plane(grid: TerrainGrid) -> (Vec<Vec3>, Vec<Vec2>) {
        let side = grid.vertices_per_side();
        let segments = grid.segments as f32;
        let mut vertices = Vec::with_capacity(grid.vertex_count());
        let mut uvs = Vec::with_capacity(grid.vertex_count());

        for row in 0..side {
            for col in 0..side {
                let (x, z) = grid.vertex_position(col, row);
                // World z = -plane y once the plane is turned horizontal
                vertices.push(Vec3::new(x, -z, 0.0));
                uvs.push(Vec2::new(col as f32 / segments, 1.0 - row as f32 / segments));
            }
        }

        (vertices, uvs)
    }

    /// Two triangles per cell, counter-clockwise when seen from above
    fn plane_indices(grid: TerrainGrid) -> Vec<u32> {
        let mut indices = Vec::with_capacity(grid.segments * grid.segments * 6);

        for row in 0..grid.segments {
            for col in 0..grid.segments {
                let a = grid.index(col, row) as u32;
                let b = grid.index(col, row + 1) as u32;
                let c = grid.index(col + 1, row + 1) as u32;
                let d = grid.index(col + 1, row) as u32;

                indices.extend_from_slice(&[a, b, d]);
                indices.extend_from_slice(&[b, c, d]);
            }
        }

        indices
    }

    fn compute_smooth_normals(vertices: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
        let mut accumulators = vec![Vec3::ZERO; vertices.len()];

        for triangle in indices.chunks_exact(3) {
            let i0 = triangle[0] as usize;
            let i1 = triangle[1] as usize;
            let i2 = triangle[2] as usize;

            let edge1 = vertices[i1] - vertices[i0];
            let edge2 = vertices[i2] - vertices[i0];
            let face_normal = edge1.cross(edge2).normalize_or_zero();

            accumulators[i0] += face_normal;
            accumulators[i1] += face_normal;
            accumulators[i2] += face_normal;
        }

        accumulators
            .into_iter()
            .map(|n| {
                if n.length_squared() > 1e-8 {
                    n.normalize()
                } else {
                    Vec3::Y
                }
            })
            .collect()
    }
}
