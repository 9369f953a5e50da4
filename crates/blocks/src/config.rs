use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::registry::RegistryError;

/// One block type entry. List position defines the `BlockType` id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockConfig {
    pub name: String,
    /// Types with `render: false` are kept out of the packed instance buffer.
    #[serde(default = "default_render")]
    pub render: bool,
    #[serde(default = "default_tile_size")]
    pub tile_size: [f32; 2],
    /// Tile-unit offsets into the sprite sheet, one per animation frame.
    #[serde(default)]
    pub frames: Vec<[f32; 2]>,
    /// Seconds per animation frame.
    #[serde(default = "default_frame_duration")]
    pub frame_duration: f32,
}

fn default_render() -> bool {
    true
}

fn default_tile_size() -> [f32; 2] {
    [16.0, 16.0]
}

fn default_frame_duration() -> f32 {
    0.25
}

impl BlockConfig {
    /// A non-rendered type such as air.
    pub fn hidden(name: &str) -> Self {
        Self {
            name: name.into(),
            render: false,
            tile_size: default_tile_size(),
            frames: Vec::new(),
            frame_duration: default_frame_duration(),
        }
    }

    /// A single-frame tile at `(column, row)` of the sprite sheet.
    pub fn tile(name: &str, column: f32, row: f32) -> Self {
        Self::animated(name, &[[column, row]], default_frame_duration())
    }

    pub fn animated(name: &str, frames: &[[f32; 2]], frame_duration: f32) -> Self {
        Self {
            name: name.into(),
            render: true,
            tile_size: default_tile_size(),
            frames: frames.to_vec(),
            frame_duration,
        }
    }
}

/// Block registry configuration: sprite sheet description plus ordered block list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Asset name of the sprite sheet texture.
    pub sheet: String,
    /// Sprite sheet size in pixels.
    pub sheet_size: [f32; 2],
    /// Tile inset applied when computing the UV scale.
    pub shrink_epsilon: f32,
    /// Name of the never-rendered background type.
    pub base: String,
    pub blocks: Vec<BlockConfig>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            sheet: "blockSpritesheet".into(),
            sheet_size: [64.0, 64.0],
            shrink_epsilon: 0.05,
            base: "air".into(),
            blocks: vec![
                BlockConfig::hidden("air"),
                BlockConfig::tile("dirt", 0.0, 0.0),
                BlockConfig::tile("grass", 1.0, 0.0),
                BlockConfig::tile("stone", 2.0, 0.0),
                BlockConfig::animated(
                    "water",
                    &[[0.0, 1.0], [1.0, 1.0], [2.0, 1.0], [3.0, 1.0]],
                    0.25,
                ),
            ],
        }
    }
}

impl RegistryConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, RegistryError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a registry configuration from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let data = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&data)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), RegistryError> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }
}
