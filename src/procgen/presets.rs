/// Named terrain shape presets
use serde::{Deserialize, Serialize};

/// Parameters turning a noise sample into a terrain height
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainShape {
    /// World units per noise unit (`h = noise(x / scale_factor, z / scale_factor)`)
    pub scale_factor: f32,
    /// Height of a full noise swing in world units
    pub amplitude: f32,
    /// Weight of the detail octave (0 disables it)
    pub detail_weight: f32,
    /// Ground colour RGB (0-1 range)
    pub ground_color: [f32; 3],
}

impl TerrainShape {
    /// Rolling sand hills
    pub fn desert() -> Self {
        Self {
            scale_factor: 100.0,
            amplitude: 50.0,
            detail_weight: 0.0,
            ground_color: [0.871, 0.722, 0.529], // burlywood
        }
    }

    /// Long, low dunes with some ripple on top
    pub fn dunes() -> Self {
        Self {
            scale_factor: 250.0,
            amplitude: 30.0,
            detail_weight: 0.2,
            ground_color: [0.93, 0.79, 0.56],
        }
    }

    /// Green, choppy hills
    pub fn hills() -> Self {
        Self {
            scale_factor: 150.0,
            amplitude: 70.0,
            detail_weight: 0.35,
            ground_color: [0.35, 0.55, 0.25],
        }
    }

    /// Almost flat salt pan
    pub fn flats() -> Self {
        Self {
            scale_factor: 400.0,
            amplitude: 4.0,
            detail_weight: 0.1,
            ground_color: [0.85, 0.85, 0.8],
        }
    }
}

impl Default for TerrainShape {
    fn default() -> Self {
        Self::desert()
    }
}

/// Names accepted by [`get_preset`]
pub const PRESET_NAMES: [&str; 4] = ["desert", "dunes", "hills", "flats"];

/// Get a terrain preset by name
///
/// Returns None if the preset name is not recognized.
pub fn get_preset(name: &str) -> Option<TerrainShape> {
    match name.to_lowercase().as_str() {
        "desert" => Some(TerrainShape::desert()),
        "dunes" => Some(TerrainShape::dunes()),
        "hills" => Some(TerrainShape::hills()),
        "flats" => Some(TerrainShape::flats()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_names_resolve() {
        for name in PRESET_NAMES {
            assert!(get_preset(name).is_some(), "preset {} missing", name);
        }
    }

    #[test]
    fn test_get_preset_case_insensitive() {
        assert!(get_preset("Desert").is_some());
        assert!(get_preset("HILLS").is_some());
        assert!(get_preset("swamp").is_none());
    }

    #[test]
    fn test_desert_matches_classic_terrain() {
        let desert = get_preset("desert").unwrap();
        assert_eq!(desert.scale_factor, 100.0);
        assert_eq!(desert.amplitude, 50.0);
        assert_eq!(desert.detail_weight, 0.0);
        assert!(get_preset("flats").unwrap().amplitude < desert.amplitude);
    }
}
