use crate::physics::CarTuning;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub terrain: TerrainSettings,
    pub car: CarSettings,
    pub placement: PlacementSettings,
    pub decorations: Vec<DecorationSettings>,
    pub checkpoints: CheckpointSettings,
    pub display: DisplaySettings,
    pub assets: AssetSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainSettings {
    pub preset: String,
    pub size: f32,
    pub segments: usize,
    pub seed: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CarSettings {
    /// Model path relative to the asset root; a placeholder box is used
    /// when unset or when loading fails
    pub model: Option<String>,
    pub tuning: CarTuning,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementSettings {
    pub exclusion_radius: f32,
    pub seed: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    Cone,
    Cuboid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecorationSettings {
    pub name: String,
    /// Model path relative to the asset root; `primitive` is used when unset
    pub model: Option<String>,
    pub primitive: Primitive,
    pub color: [f32; 3],
    pub count: usize,
    pub scale_min: f32,
    pub scale_max: f32,
    pub random_yaw: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckpointSettings {
    pub radius: f32,
    pub points: Vec<[f32; 3]>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub frame_rate_hz: u16,
    pub minimap_width: usize,
    pub minimap_height: usize,
    /// Frames a key stays held on terminals without release events
    pub key_hold_frames: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetSettings {
    pub root_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub console_enabled: bool,
    pub json: bool,
    /// Log file path; written through a non-blocking appender
    pub file: Option<String>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            terrain: TerrainSettings::default(),
            car: CarSettings::default(),
            placement: PlacementSettings::default(),
            decorations: vec![DecorationSettings::tree(), DecorationSettings::rock()],
            checkpoints: CheckpointSettings::default(),
            display: DisplaySettings::default(),
            assets: AssetSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            preset: "desert".to_string(),
            size: 2000.0,
            segments: 200,
            seed: 42,
        }
    }
}

impl Default for CarSettings {
    fn default() -> Self {
        Self {
            model: Some("car.glb".to_string()),
            tuning: CarTuning::default(),
        }
    }
}

impl Default for PlacementSettings {
    fn default() -> Self {
        Self {
            exclusion_radius: 30.0,
            seed: 1,
        }
    }
}

impl Default for DecorationSettings {
    fn default() -> Self {
        Self::tree()
    }
}

impl DecorationSettings {
    pub fn tree() -> Self {
        Self {
            name: "tree".to_string(),
            model: None,
            primitive: Primitive::Cone,
            color: [0.133, 0.545, 0.133], // forest green
            count: 50,
            scale_min: 0.8,
            scale_max: 1.4,
            random_yaw: false,
        }
    }

    pub fn rock() -> Self {
        Self {
            name: "rock".to_string(),
            model: None,
            primitive: Primitive::Cuboid,
            color: [0.5, 0.47, 0.43],
            count: 30,
            scale_min: 0.5,
            scale_max: 2.0,
            random_yaw: true,
        }
    }
}

impl Default for CheckpointSettings {
    fn default() -> Self {
        Self {
            radius: crate::checkpoints::DEFAULT_CHECKPOINT_RADIUS,
            points: vec![[50.0, 0.0, 50.0], [-100.0, 0.0, 200.0], [200.0, 0.0, -150.0]],
        }
    }
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            frame_rate_hz: 60,
            minimap_width: 48,
            minimap_height: 24,
            key_hold_frames: 8,
        }
    }
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            root_dir: "./assets".to_string(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            console_enabled: true,
            json: false,
            file: None,
        }
    }
}

impl GameConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: GameConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            eprintln!("Failed to load config: {}, using defaults", e);
            Self::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.terrain.size, 2000.0);
        assert_eq!(config.terrain.segments, 200);
        assert_eq!(config.car.tuning.max_speed, 0.6);
        assert_eq!(config.checkpoints.points.len(), 3);
        assert_eq!(config.decorations.len(), 2);
    }

    #[test]
    fn test_config_serialization() {
        let config = GameConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("exclusion_radius"));
        assert!(toml_str.contains("[[decorations]]"));
        assert!(toml_str.contains("turn_threshold"));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[terrain]
seed = 7

[car.tuning]
max_speed = 1.2

[[decorations]]
name = "cactus"
model = "cactus.glb"
count = 12
"#
        )
        .unwrap();

        let config = GameConfig::load(file.path()).unwrap();
        assert_eq!(config.terrain.seed, 7);
        assert_eq!(config.terrain.segments, 200);
        assert_eq!(config.car.tuning.max_speed, 1.2);
        assert_eq!(config.car.tuning.friction, 0.97);
        assert_eq!(config.decorations.len(), 1);
        assert_eq!(config.decorations[0].model.as_deref(), Some("cactus.glb"));
        assert_eq!(config.decorations[0].primitive, Primitive::Cone);
    }

    #[test]
    fn test_invalid_file_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "terrain = 3").unwrap();
        assert!(matches!(GameConfig::load(file.path()), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let config = GameConfig::load_or_default("/nonexistent/drive.toml");
        assert_eq!(config.decorations.len(), 2);
        assert_eq!(config.logging.level, "info");
    }
}
