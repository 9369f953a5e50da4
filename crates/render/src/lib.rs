//! Rendering: backend-agnostic terrain drawing.
//!
//! # Invariants
//! - All GPU binding state flows through one `RenderContext` passed by `&mut`;
//!   nothing is bound behind the caller's back.
//! - Per frame the terrain shader, camera matrices, tint and sprite sheet are
//!   bound once; per chunk the instance buffer is bound once; per block type
//!   one uniform upload and one instanced draw.
//! - Draw order follows the terrain's visible chunk order, then block type order.

mod assets;
mod batcher;
mod camera;
mod context;
mod recording;
mod renderer;

pub use assets::{AssetProvider, AssetTable};
pub use batcher::{ChunkBatcher, ChunkDrawStats, DrawBatch};
pub use camera::{Camera, OrthoCamera};
pub use context::{BlockUniforms, RenderCommand, RenderContext};
pub use recording::{OrderViolation, RecordingContext};
pub use renderer::{FrameStats, RenderError, TerrainRenderer, TerrainRendererConfig};

/// Index count of the shared unit quad (two triangles).
pub const QUAD_INDEX_COUNT: u32 = 6;

pub fn crate_info() -> &'static str {
    "blockscape-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
