use blockscape_blocks::BlockTypeRegistry;
use blockscape_common::{BlockCoord, BlockType, ChunkCoord, GpuResources};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::chunk::{Chunk, ChunkError};
use crate::generator::{GeneratorConfig, GeneratorError, TerrainGenerator};

/// Errors from terrain operations.
#[derive(Debug, thiserror::Error)]
pub enum TerrainError {
    #[error(transparent)]
    Chunk(#[from] ChunkError),
    #[error(transparent)]
    Generator(#[from] GeneratorError),
    #[error("chunk {0:?} is not loaded")]
    NotLoaded(ChunkCoord),
    #[error("view window must be at least 1x1 chunks, got {0}x{1}")]
    EmptyView(u32, u32),
}

/// Terrain configuration: generator seed, view window and streaming budgets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    pub seed: u64,
    /// Visible window width in chunks.
    pub view_width: u32,
    /// Visible window height in chunks.
    pub view_height: u32,
    /// Extra ring of chunks (in chunks) kept loaded around the visible window.
    pub preload_margin: u32,
    /// Maximum number of preload chunks generated per update.
    pub load_budget: usize,
    /// Maximum number of chunks unloaded per update.
    pub unload_budget: usize,
    pub generator: GeneratorConfig,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            view_width: 5,
            view_height: 3,
            preload_margin: 1,
            load_budget: 4,
            unload_budget: 4,
            generator: GeneratorConfig::default(),
        }
    }
}

/// Per-update streaming statistics.
#[derive(Debug, Clone, Default)]
pub struct StreamStats {
    pub chunks_loaded_this_update: usize,
    pub chunks_unloaded_this_update: usize,
    pub total_loaded_chunks: usize,
    pub update_time: Duration,
}

/// All loaded chunks plus the fixed-size, ordered window of visible ones.
///
/// Visible chunks are always loaded and uploaded; the preload ring is filled
/// under a per-update budget.
pub struct Terrain {
    config: TerrainConfig,
    registry: Arc<BlockTypeRegistry>,
    generator: TerrainGenerator,
    chunks: BTreeMap<ChunkCoord, Chunk>,
    visible: Vec<ChunkCoord>,
    stats: StreamStats,
}

impl Terrain {
    pub fn new(
        config: TerrainConfig,
        registry: Arc<BlockTypeRegistry>,
    ) -> Result<Self, TerrainError> {
        if config.view_width == 0 || config.view_height == 0 {
            return Err(TerrainError::EmptyView(config.view_width, config.view_height));
        }
        let generator = TerrainGenerator::new(config.seed, config.generator.clone(), &registry)?;
        Ok(Self {
            config,
            registry,
            generator,
            chunks: BTreeMap::new(),
            visible: Vec::new(),
            stats: StreamStats::default(),
        })
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<BlockTypeRegistry> {
        &self.registry
    }

    pub fn generator(&self) -> &TerrainGenerator {
        &self.generator
    }

    /// Move the view window to the chunk containing `focus` (world units).
    /// Returns the chunks loaded and unloaded by this update.
    pub fn update_focus(
        &mut self,
        focus: Vec2,
        gpu: &mut impl GpuResources,
    ) -> Result<(Vec<ChunkCoord>, Vec<ChunkCoord>), TerrainError> {
        let _span = tracing::info_span!("terrain_update").entered();
        let start = Instant::now();
        let center = ChunkCoord::from_world(focus);

        self.visible = view_window(center, self.config.view_width, self.config.view_height);
        let margin = self.config.preload_margin;
        let desired: BTreeSet<ChunkCoord> = view_window(
            center,
            self.config.view_width + 2 * margin,
            self.config.view_height + 2 * margin,
        )
        .into_iter()
        .collect();

        let mut loaded = Vec::new();
        for coord in self.visible.clone() {
            if self.load(coord, gpu)? {
                loaded.push(coord);
            }
        }

        let preload: Vec<ChunkCoord> = desired
            .iter()
            .filter(|c| !self.chunks.contains_key(c))
            .take(self.config.load_budget)
            .copied()
            .collect();
        for coord in preload {
            if self.load(coord, gpu)? {
                loaded.push(coord);
            }
        }

        let to_unload: Vec<ChunkCoord> = self
            .chunks
            .keys()
            .filter(|c| !desired.contains(c))
            .take(self.config.unload_budget)
            .copied()
            .collect();
        for coord in &to_unload {
            if let Some(mut chunk) = self.chunks.remove(coord) {
                tracing::debug!(?coord, "unloading chunk");
                chunk.release_gpu(gpu);
            }
        }

        self.stats = StreamStats {
            chunks_loaded_this_update: loaded.len(),
            chunks_unloaded_this_update: to_unload.len(),
            total_loaded_chunks: self.chunks.len(),
            update_time: start.elapsed(),
        };
        tracing::trace!(
            loaded = loaded.len(),
            unloaded = to_unload.len(),
            total = self.chunks.len(),
            "terrain update complete"
        );

        Ok((loaded, to_unload))
    }

    fn load(
        &mut self,
        coord: ChunkCoord,
        gpu: &mut impl GpuResources,
    ) -> Result<bool, TerrainError> {
        if let Some(chunk) = self.chunks.get_mut(&coord) {
            chunk.sync_gpu(gpu);
            return Ok(false);
        }
        tracing::debug!(?coord, "loading chunk");
        let mut chunk = self.generator.generate(coord, &self.registry)?;
        chunk.sync_gpu(gpu);
        self.chunks.insert(coord, chunk);
        Ok(true)
    }

    /// Visible chunks in draw order: top row first, left to right.
    pub fn visible_chunks(&self) -> impl Iterator<Item = &Chunk> + '_ {
        self.visible.iter().filter_map(|c| self.chunks.get(c))
    }

    pub fn visible_coords(&self) -> &[ChunkCoord] {
        &self.visible
    }

    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    pub fn loaded_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_loaded(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    pub fn block(&self, block: BlockCoord) -> Option<BlockType> {
        self.chunks.get(&block.chunk())?.block(block.local())
    }

    /// Edit one block and re-upload its chunk.
    pub fn set_block(
        &mut self,
        block: BlockCoord,
        kind: BlockType,
        gpu: &mut impl GpuResources,
    ) -> Result<(), TerrainError> {
        let coord = block.chunk();
        let chunk = self
            .chunks
            .get_mut(&coord)
            .ok_or(TerrainError::NotLoaded(coord))?;
        chunk.set_block(block.local(), kind, &self.registry)?;
        chunk.sync_gpu(gpu);
        Ok(())
    }

    /// Release every chunk's GPU buffer and drop all chunks.
    pub fn clear(&mut self, gpu: &mut impl GpuResources) {
        for chunk in self.chunks.values_mut() {
            chunk.release_gpu(gpu);
        }
        self.chunks.clear();
        self.visible.clear();
    }

    pub fn stats(&self) -> &StreamStats {
        &self.stats
    }
}

/// Chunk coordinates of a `width x height` window around `center`, row-major from the top.
fn view_window(center: ChunkCoord, width: u32, height: u32) -> Vec<ChunkCoord> {
    let left = center.x - (width as i32 - 1) / 2;
    let top = center.y + height as i32 / 2;
    let mut coords = Vec::with_capacity((width * height) as usize);
    for row in 0..height as i32 {
        for col in 0..width as i32 {
            coords.push(ChunkCoord::new(left + col, top - row));
        }
    }
    coords
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeGpu;
    use blockscape_blocks::builtin;

    fn terrain(config: TerrainConfig) -> Terrain {
        Terrain::new(config, Arc::new(BlockTypeRegistry::builtin())).unwrap()
    }

    #[test]
    fn view_window_is_row_major_from_top() {
        let coords = view_window(ChunkCoord::new(0, 0), 3, 2);
        assert_eq!(
            coords,
            vec![
                ChunkCoord::new(-1, 1),
                ChunkCoord::new(0, 1),
                ChunkCoord::new(1, 1),
                ChunkCoord::new(-1, 0),
                ChunkCoord::new(0, 0),
                ChunkCoord::new(1, 0),
            ]
        );
    }

    #[test]
    fn visible_window_is_fixed_size_and_uploaded() {
        let mut gpu = FakeGpu::default();
        let mut t = terrain(TerrainConfig {
            view_width: 3,
            view_height: 2,
            preload_margin: 0,
            ..TerrainConfig::default()
        });
        t.update_focus(Vec2::new(8.0, 8.0), &mut gpu).unwrap();

        let visible: Vec<_> = t.visible_chunks().map(Chunk::coord).collect();
        assert_eq!(visible, t.visible_coords());
        assert_eq!(visible.len(), 6);
        assert!(t.visible_chunks().all(|c| c.uploaded().is_some() && !c.is_dirty()));
        assert_eq!(t.loaded_count(), 6);
    }

    #[test]
    fn preload_respects_budget() {
        let mut gpu = FakeGpu::default();
        let mut t = terrain(TerrainConfig {
            view_width: 1,
            view_height: 1,
            preload_margin: 1,
            load_budget: 2,
            ..TerrainConfig::default()
        });
        let (loaded, _) = t.update_focus(Vec2::ZERO, &mut gpu).unwrap();
        // 1 visible chunk plus 2 budgeted preloads
        assert_eq!(loaded.len(), 3);
        assert_eq!(t.stats().chunks_loaded_this_update, 3);

        t.update_focus(Vec2::ZERO, &mut gpu).unwrap();
        t.update_focus(Vec2::ZERO, &mut gpu).unwrap();
        t.update_focus(Vec2::ZERO, &mut gpu).unwrap();
        assert_eq!(t.loaded_count(), 9);
    }

    #[test]
    fn moving_away_unloads_and_releases() {
        let mut gpu = FakeGpu::default();
        let mut t = terrain(TerrainConfig {
            view_width: 2,
            view_height: 2,
            preload_margin: 0,
            unload_budget: 100,
            generator: GeneratorConfig {
                surface_height: 1000,
                ..GeneratorConfig::default()
            },
            ..TerrainConfig::default()
        });
        t.update_focus(Vec2::ZERO, &mut gpu).unwrap();
        assert_eq!(gpu.live(), 4);

        let far = Vec2::new(10_000.0, 0.0);
        let (_, unloaded) = t.update_focus(far, &mut gpu).unwrap();
        assert_eq!(unloaded.len(), 4);
        assert_eq!(t.loaded_count(), 4);
        assert_eq!(gpu.live(), 4);
    }

    #[test]
    fn set_block_reuploads() {
        let mut gpu = FakeGpu::default();
        let mut t = terrain(TerrainConfig::default());
        t.update_focus(Vec2::ZERO, &mut gpu).unwrap();

        let target = BlockCoord::new(3, 200);
        t.set_block(target, builtin::STONE, &mut gpu).unwrap_err();

        let target = BlockCoord::new(3, 4);
        t.set_block(target, builtin::STONE, &mut gpu).unwrap();
        assert_eq!(t.block(target), Some(builtin::STONE));
        let chunk = t.chunk(target.chunk()).unwrap();
        assert!(!chunk.is_dirty());
        assert_eq!(chunk.uploaded().unwrap().counts(), chunk.instance_counts());
    }

    #[test]
    fn clear_releases_everything() {
        let mut gpu = FakeGpu::default();
        let mut t = terrain(TerrainConfig {
            generator: GeneratorConfig {
                surface_height: 1000,
                ..GeneratorConfig::default()
            },
            ..TerrainConfig::default()
        });
        t.update_focus(Vec2::ZERO, &mut gpu).unwrap();
        assert!(gpu.live() > 0);
        t.clear(&mut gpu);
        assert_eq!(gpu.live(), 0);
        assert_eq!(t.visible_chunks().count(), 0);
    }

    #[test]
    fn empty_view_is_rejected() {
        let result = Terrain::new(
            TerrainConfig {
                view_width: 0,
                ..TerrainConfig::default()
            },
            Arc::new(BlockTypeRegistry::builtin()),
        );
        assert!(matches!(result, Err(TerrainError::EmptyView(0, 3))));
    }
}
