/// Scatter decorations over the terrain
use super::heightfield::Heightfield;
use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// How a batch of decorations is scattered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementParams {
    /// Placement attempts; rejected attempts are not retried
    pub count: usize,
    /// Uniform scale range, inclusive
    pub scale_range: (f32, f32),
    /// Nothing is placed closer than this to the origin
    pub exclusion_radius: f32,
    /// Draw a random yaw in [0, 2π) for each instance
    pub random_yaw: bool,
}

/// A placed scenery object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecorationInstance {
    pub name: String,
    pub position: Vec3,
    pub scale: f32,
    pub yaw_rad: f32,
}

/// Place up to `params.count` decorations on `heightfield`.
///
/// Each attempt draws `x` and `z` uniformly across the terrain. Attempts inside
/// the exclusion radius are dropped. The elevation is the heightfield sample
/// of the cell containing `(x, z)` (0.0 if the cell has no sample), so an
/// instance always sits on the terrain vertex it maps to.
pub fn place<R: Rng + ?Sized>(
    name: &str,
    params: &PlacementParams,
    heightfield: &Heightfield,
    rng: &mut R,
) -> Vec<DecorationInstance> {
    let half = heightfield.grid().half_size();
    let (scale_lo, scale_hi) = ordered(params.scale_range);
    let mut placed = Vec::with_capacity(params.count);

    for _ in 0..params.count {
        let x = rng.random_range(-half..=half);
        let z = rng.random_range(-half..=half);

        if in_exclusion_zone(x, z, params.exclusion_radius) {
            continue;
        }

        let y = heightfield.height_at_cell(x, z).unwrap_or(0.0);
        let scale = rng.random_range(scale_lo..=scale_hi);
        let yaw_rad = if params.random_yaw {
            rng.random_range(0.0..TAU)
        } else {
            0.0
        };

        placed.push(DecorationInstance {
            name: name.to_string(),
            position: Vec3::new(x, y, z),
            scale,
            yaw_rad,
        });
    }

    placed
}

/// True when `(x, z)` lies strictly inside the spawn-safe disk
pub fn in_exclusion_zone(x: f32, z: f32, radius: f32) -> bool {
    (x * x + z * z).sqrt() < radius
}

fn ordered((a, b): (f32, f32)) -> (f32, f32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
