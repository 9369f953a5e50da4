//! Shared types for the blockscape terrain renderer.
//!
//! # Invariants
//! - `BlockType` values are dense indices; their order is the packing order
//!   used by every chunk.
//! - A handle with value 0 means "absent".

mod gpu;
mod types;

pub use gpu::{GpuResources, InstanceBufferHandle, InstanceRaw, ShaderHandle, TextureHandle};
pub use types::{BlockCoord, BlockType, ChunkCoord, LocalCoord};

/// Side length of one block in world units (pixels of the sprite sheet at 1x zoom).
pub const BLOCK_SIZE: f32 = 16.0;

/// Blocks per chunk along X.
pub const CHUNK_WIDTH: u32 = 16;

/// Blocks per chunk along Y.
pub const CHUNK_HEIGHT: u32 = 16;

/// Number of block cells in a chunk.
pub const CHUNK_VOLUME: usize = (CHUNK_WIDTH * CHUNK_HEIGHT) as usize;

/// Upper bound on animation frames per block type. Must match the terrain shader.
pub const MAX_ANIMATION_LENGTH: usize = 8;

pub fn crate_info() -> &'static str {
    "blockscape-common v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("common"));
    }

    #[test]
    fn chunk_volume_matches_dimensions() {
        assert_eq!(CHUNK_VOLUME, 256);
    }
}
