use blockscape_common::{BlockType, MAX_ANIMATION_LENGTH};
use glam::Vec2;
use std::collections::HashMap;
use std::path::Path;

use crate::config::RegistryConfig;
use crate::metadata::RenderMetadata;

static NO_RENDER: RenderMetadata = RenderMetadata::NONE;

/// Errors from building or loading a block registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("registry has no block types")]
    Empty,
    #[error("too many block types: {0}")]
    TooManyTypes(usize),
    #[error("duplicate block name: {0}")]
    DuplicateName(String),
    #[error("base type {0:?} is not declared")]
    UnknownBase(String),
    #[error("base type {0:?} must not be renderable")]
    BaseRenderable(String),
    #[error("block {name:?} has no animation frames")]
    NoFrames { name: String },
    #[error("block {name:?} has {frames} frames, maximum is {max}")]
    TooManyFrames {
        name: String,
        frames: usize,
        max: usize,
    },
    #[error("block {name:?} tile size {size:?} must exceed the shrink epsilon {epsilon}")]
    InvalidTileSize {
        name: String,
        size: [f32; 2],
        epsilon: f32,
    },
    #[error("block {name:?} is animated but frame duration is {duration}")]
    InvalidFrameDuration { name: String, duration: f32 },
    #[error("sprite sheet size {0:?} must be positive")]
    InvalidSheetSize([f32; 2]),
}

/// Immutable mapping from block type to render metadata.
///
/// Lookups never fail: unknown and non-rendered types resolve to
/// `RenderMetadata::NONE` so callers can skip them uniformly.
#[derive(Debug, Clone)]
pub struct BlockTypeRegistry {
    sheet: String,
    base: BlockType,
    names: Vec<String>,
    metadata: Vec<RenderMetadata>,
    by_name: HashMap<String, BlockType>,
}

impl BlockTypeRegistry {
    /// Registry built from `RegistryConfig::default()`.
    pub fn builtin() -> Self {
        match Self::from_config(&RegistryConfig::default()) {
            Ok(registry) => registry,
            Err(e) => unreachable!("default registry config is invalid: {e}"),
        }
    }

    /// Validate a configuration and build the registry from it.
    pub fn from_config(config: &RegistryConfig) -> Result<Self, RegistryError> {
        if config.blocks.is_empty() {
            return Err(RegistryError::Empty);
        }
        if config.blocks.len() > u16::MAX as usize {
            return Err(RegistryError::TooManyTypes(config.blocks.len()));
        }
        if config.sheet_size.iter().any(|&s| s <= 0.0) {
            return Err(RegistryError::InvalidSheetSize(config.sheet_size));
        }

        let mut names = Vec::with_capacity(config.blocks.len());
        let mut metadata = Vec::with_capacity(config.blocks.len());
        let mut by_name = HashMap::new();

        for (index, block) in config.blocks.iter().enumerate() {
            if by_name.insert(block.name.clone(), BlockType::from(index)).is_some() {
                return Err(RegistryError::DuplicateName(block.name.clone()));
            }
            names.push(block.name.clone());
            metadata.push(if block.render {
                Self::build_metadata(config, block)?
            } else {
                RenderMetadata::NONE
            });
        }

        let base = *by_name
            .get(&config.base)
            .ok_or_else(|| RegistryError::UnknownBase(config.base.clone()))?;
        if metadata[base.index()].renderable {
            return Err(RegistryError::BaseRenderable(config.base.clone()));
        }

        tracing::debug!(
            types = names.len(),
            base = %config.base,
            sheet = %config.sheet,
            "block registry built"
        );

        Ok(Self {
            sheet: config.sheet.clone(),
            base,
            names,
            metadata,
            by_name,
        })
    }

    /// Load and validate a registry from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        Self::from_config(&RegistryConfig::load(path)?)
    }

    fn build_metadata(
        config: &RegistryConfig,
        block: &crate::config::BlockConfig,
    ) -> Result<RenderMetadata, RegistryError> {
        let name = block.name.clone();
        if block.frames.is_empty() {
            return Err(RegistryError::NoFrames { name });
        }
        if block.frames.len() > MAX_ANIMATION_LENGTH {
            return Err(RegistryError::TooManyFrames {
                name,
                frames: block.frames.len(),
                max: MAX_ANIMATION_LENGTH,
            });
        }
        if block.tile_size.iter().any(|&s| s <= config.shrink_epsilon) {
            return Err(RegistryError::InvalidTileSize {
                name,
                size: block.tile_size,
                epsilon: config.shrink_epsilon,
            });
        }
        if block.frames.len() > 1 && block.frame_duration <= 0.0 {
            return Err(RegistryError::InvalidFrameDuration {
                name,
                duration: block.frame_duration,
            });
        }

        let mut uv_offsets = [Vec2::ZERO; MAX_ANIMATION_LENGTH];
        for (slot, frame) in uv_offsets.iter_mut().zip(&block.frames) {
            *slot = Vec2::from_array(*frame);
        }

        Ok(RenderMetadata {
            renderable: true,
            texture_size: Vec2::from_array(config.sheet_size),
            tile_size: Vec2::from_array(block.tile_size),
            shrink_epsilon: config.shrink_epsilon,
            uv_offsets,
            frame_count: block.frames.len() as u32,
            frame_duration: block.frame_duration,
        })
    }

    /// Render metadata for a type, or `RenderMetadata::NONE` if it has no visual.
    pub fn metadata_for(&self, block: BlockType) -> &RenderMetadata {
        self.metadata.get(block.index()).unwrap_or(&NO_RENDER)
    }

    pub fn is_renderable(&self, block: BlockType) -> bool {
        self.metadata_for(block).renderable
    }

    /// The never-rendered background type.
    pub fn base_type(&self) -> BlockType {
        self.base
    }

    /// Asset name of the sprite sheet every type samples from.
    pub fn sheet(&self) -> &str {
        &self.sheet
    }

    pub fn id(&self, name: &str) -> Option<BlockType> {
        self.by_name.get(name).copied()
    }

    pub fn name(&self, block: BlockType) -> Option<&str> {
        self.names.get(block.index()).map(String::as_str)
    }

    pub fn contains(&self, block: BlockType) -> bool {
        block.index() < self.names.len()
    }

    /// Number of declared block types.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// All types in packing order.
    pub fn types(&self) -> impl Iterator<Item = BlockType> + '_ {
        (0..self.names.len()).map(BlockType::from)
    }
}
