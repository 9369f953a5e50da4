use anyhow::Context;
use blockscape_blocks::RegistryConfig;
use blockscape_render::TerrainRendererConfig;
use blockscape_terrain::TerrainConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level YAML document. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockscapeConfig {
    pub registry: RegistryConfig,
    pub terrain: TerrainConfig,
    pub renderer: TerrainRendererConfig,
}

impl BlockscapeConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_yaml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Load `path` when given, otherwise fall back to defaults.
    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
