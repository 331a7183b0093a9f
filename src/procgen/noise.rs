/// Seeded noise sampler for terrain heights
use noise::{NoiseFn, Perlin};

/// Frequency of the detail octave relative to the base octave
const DETAIL_FREQUENCY: f64 = 4.0;

/// Two-layer Perlin noise sampler
pub struct TerrainNoise {
    /// Base terrain shape
    base: Perlin,
    /// Higher-frequency detail layered over the base
    detail: Perlin,
}

impl TerrainNoise {
    /// Create a new terrain noise generator with the given seed
    pub fn new(seed: u32) -> Self {
        Self {
            base: Perlin::new(seed),
            detail: Perlin::new(seed.wrapping_add(1)),
        }
    }

    /// Sample the base octave at noise-space coordinates
    ///
    /// Perlin output is roughly [-1, 1]; it is clamped so the bound is exact.
    pub fn sample(&self, nx: f32, nz: f32) -> f32 {
        (self.base.get([nx as f64, nz as f64]) as f32).clamp(-1.0, 1.0)
    }

    /// Sample the base octave blended with the detail octave
    ///
    /// The weighted sum is divided by `1 + detail_weight`, so the result keeps
    /// the [-1, 1] bound of a single octave and amplitude scaling stays
    /// predictable. A weight of zero gives exactly [`TerrainNoise::sample`].
    pub fn sample_layered(&self, nx: f32, nz: f32, detail_weight: f32) -> f32 {
        let base = self.sample(nx, nz);
        if detail_weight <= 0.0 {
            return base;
        }

        let detail = self.detail.get([
            nx as f64 * DETAIL_FREQUENCY,
            nz as f64 * DETAIL_FREQUENCY,
        ]) as f32;
        let detail = detail.clamp(-1.0, 1.0);

        (base + detail * detail_weight) / (1.0 + detail_weight)
    }
}
