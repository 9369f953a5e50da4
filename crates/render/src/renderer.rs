use blockscape_blocks::{BlockAnimations, BlockTypeRegistry};
use blockscape_terrain::{Chunk, Terrain};
use glam::Vec4;
use serde::{Deserialize, Serialize};

use crate::assets::AssetProvider;
use crate::batcher::ChunkBatcher;
use crate::camera::Camera;
use crate::context::RenderContext;

/// Fatal configuration errors. Nothing is drawn when one is returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    #[error("terrain shader {0:?} is not loaded")]
    MissingShader(String),
    #[error("block sprite sheet {0:?} is not loaded")]
    MissingTexture(String),
}

/// Asset names and constant uniforms for the terrain pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainRendererConfig {
    pub shader: String,
    pub texture: String,
    pub tint: [f32; 4],
}

impl Default for TerrainRendererConfig {
    fn default() -> Self {
        Self {
            shader: "terrainShader".into(),
            texture: "blockSpritesheet".into(),
            tint: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

/// Work issued for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub chunks_visited: u32,
    pub chunks_drawn: u32,
    pub draws: u32,
    pub instances: u32,
}

/// Draws the visible terrain with one instanced draw per block type per chunk.
///
/// Binding state left in the context after `render` is unspecified.
#[derive(Debug, Default)]
pub struct TerrainRenderer {
    config: TerrainRendererConfig,
    batcher: ChunkBatcher,
}

impl TerrainRenderer {
    pub fn new(config: TerrainRendererConfig) -> Self {
        Self {
            config,
            batcher: ChunkBatcher::new(),
        }
    }

    pub fn config(&self) -> &TerrainRendererConfig {
        &self.config
    }

    /// Render the terrain's visible chunks in the order the terrain gives them.
    pub fn render(
        &mut self,
        ctx: &mut impl RenderContext,
        assets: &impl AssetProvider,
        camera: &impl Camera,
        terrain: &Terrain,
        animations: &BlockAnimations,
    ) -> Result<FrameStats, RenderError> {
        self.render_chunks(
            ctx,
            assets,
            camera,
            terrain.visible_chunks(),
            terrain.registry(),
            animations,
        )
    }

    /// Render an explicit chunk sequence. Frame state is bound once, before the
    /// first chunk; nothing at all is issued if the shader or sheet is missing.
    pub fn render_chunks<'a>(
        &mut self,
        ctx: &mut impl RenderContext,
        assets: &impl AssetProvider,
        camera: &impl Camera,
        chunks: impl IntoIterator<Item = &'a Chunk>,
        registry: &BlockTypeRegistry,
        animations: &BlockAnimations,
    ) -> Result<FrameStats, RenderError> {
        let _span = tracing::info_span!("terrain_render").entered();

        let shader = assets.shader(&self.config.shader);
        if !shader.is_valid() {
            tracing::error!(shader = %self.config.shader, "terrain shader missing, frame not drawn");
            return Err(RenderError::MissingShader(self.config.shader.clone()));
        }
        let texture = assets.texture(&self.config.texture);
        if !texture.is_valid() {
            tracing::error!(texture = %self.config.texture, "sprite sheet missing, frame not drawn");
            return Err(RenderError::MissingTexture(self.config.texture.clone()));
        }

        let projection = camera.projection_matrix();
        let view = camera.view_matrix();

        ctx.bind_shader(shader);
        ctx.set_projection(projection);
        ctx.set_view(view);
        ctx.set_tint(Vec4::from_array(self.config.tint));
        ctx.bind_texture(texture);

        let mut stats = FrameStats::default();
        for chunk in chunks {
            stats.chunks_visited += 1;
            let drawn = self.batcher.draw(ctx, chunk, registry, animations);
            if drawn.draws > 0 {
                stats.chunks_drawn += 1;
            }
            stats.draws += drawn.draws;
            stats.instances += drawn.instances;
            tracing::debug!(
                chunk = ?chunk.coord(),
                draws = drawn.draws,
                instances = drawn.instances,
                "chunk rendered"
            );
        }

        tracing::debug!(
            chunks = stats.chunks_visited,
            draws = stats.draws,
            instances = stats.instances,
            "terrain frame issued"
        );
        Ok(stats)
    }
}
