/// Procedural world generation
///
/// Heightfield generation, terrain presets and decoration scattering. Every
/// piece maps world positions to grid vertices through [`grid::TerrainGrid`].

pub mod decorations;
pub mod grid;
pub mod heightfield;
pub mod noise;
pub mod presets;
pub mod terrain;

// Re-export main types for convenience
pub use decorations::{place, DecorationInstance, PlacementParams};
pub use grid::TerrainGrid;
pub use heightfield::Heightfield;
pub use presets::{get_preset, TerrainShape};
pub use terrain::{generate, generate_heightfield};
