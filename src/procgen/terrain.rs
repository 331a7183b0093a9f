/// Heightfield generation
use super::grid::TerrainGrid;
use super::heightfield::Heightfield;
use super::noise::TerrainNoise;
use super::presets::TerrainShape;
use tracing::{debug, info};

/// Generate a heightfield for a `size` x `size` terrain split into `segments`
/// cells per axis.
///
/// Every sample is `noise(x / scale_factor, z / scale_factor) * amplitude`
/// evaluated at the world position of its vertex, so the result depends only
/// on the grid, the shape and the seed.
pub fn generate_heightfield(grid: TerrainGrid, seed: u32, shape: &TerrainShape) -> Heightfield {
    info!(
        "Generating heightfield: {}x{} vertices over {:.0}m (seed {})",
        grid.vertices_per_side(),
        grid.vertices_per_side(),
        grid.size,
        seed
    );

    let noise = TerrainNoise::new(seed);
    let side = grid.vertices_per_side();
    let mut heights = Vec::with_capacity(grid.vertex_count());

    for row in 0..side {
        for col in 0..side {
            let (x, z) = grid.vertex_position(col, row);
            heights.push(height_at(&noise, x, z, shape));
        }
    }

    let field = Heightfield::from_samples(grid, seed, heights);
    let (lo, hi) = field.height_range();
    debug!("Heightfield range: {:.2} .. {:.2}", lo, hi);
    field
}

/// Shorthand for `generate_heightfield` with the default desert shape
pub fn generate(size: f32, segments: usize, seed: u32) -> Heightfield {
    generate_heightfield(TerrainGrid::new(size, segments), seed, &TerrainShape::desert())
}

fn height_at(noise: &TerrainNoise, x: f32, z: f32, shape: &TerrainShape) -> f32 {
    let nx = x / shape.scale_factor;
    let nz = z / shape.scale_factor;
    noise.sample_layered(nx, nz, shape.detail_weight) * shape.amplitude
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_count_matches_vertices() {
        let field = generate(200.0, 20, 1);
        assert_eq!(field.heights().len(), 21 * 21);
    }

    #[test]
    fn test_deterministic_terrain() {
        let first = generate(2000.0, 200, 42);
        let second = generate(2000.0, 200, 42);

        assert_eq!(first.get(0, 0), second.get(0, 0));
        assert_eq!(first.heights(), second.heights());
    }

    #[test]
    fn test_seed_changes_terrain() {
        let first = generate(500.0, 50, 1);
        let second = generate(500.0, 50, 2);
        assert_ne!(first.heights(), second.heights());
    }

    #[test]
    fn test_heights_bounded_by_amplitude() {
        let shape = TerrainShape::hills();
        let field = generate_heightfield(TerrainGrid::new(1000.0, 50), 9, &shape);
        let (lo, hi) = field.height_range();
        assert!(lo >= -shape.amplitude && hi <= shape.amplitude);
        assert!(hi > lo, "terrain should not be flat");
    }

    #[test]
    fn test_sample_is_function_of_world_position() {
        // A finer grid over the same area shares every other vertex with the
        // coarse one, and those shared vertices must agree.
        let shape = TerrainShape::dunes();
        let coarse = generate_heightfield(TerrainGrid::new(400.0, 10), 5, &shape);
        let fine = generate_heightfield(TerrainGrid::new(400.0, 20), 5, &shape);

        for row in 0..=10 {
            for col in 0..=10 {
                assert_eq!(coarse.get(col, row), fine.get(col * 2, row * 2));
            }
        }
    }
}
