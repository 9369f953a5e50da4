//! Block types and their render metadata.
//!
//! # Invariants
//! - The registry is built once from a `RegistryConfig` and never mutated.
//! - Declaration order of block types is the order chunks pack instances in.
//! - The base type (usually "air") is never renderable.

mod animation;
mod config;
mod metadata;
mod registry;

pub use animation::BlockAnimations;
pub use config::{BlockConfig, RegistryConfig};
pub use metadata::RenderMetadata;
pub use registry::{BlockTypeRegistry, RegistryError};

/// Ids of the block types in `RegistryConfig::default()`.
pub mod builtin {
    use blockscape_common::BlockType;

    pub const AIR: BlockType = BlockType(0);
    pub const DIRT: BlockType = BlockType(1);
    pub const GRASS: BlockType = BlockType(2);
    pub const STONE: BlockType = BlockType(3);
    pub const WATER: BlockType = BlockType(4);
}

pub fn crate_info() -> &'static str {
    "blockscape-blocks v0.1.0"
}
