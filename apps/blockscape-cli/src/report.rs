use blockscape_blocks::{BlockAnimations, BlockTypeRegistry};
use blockscape_render::{ChunkBatcher, FrameStats};
use blockscape_terrain::Terrain;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DrawReport {
    pub block: String,
    pub base_instance: u32,
    pub count: u32,
    pub frame: u32,
}

#[derive(Debug, Serialize)]
pub struct ChunkReport {
    pub chunk: [i32; 2],
    pub uploaded: bool,
    pub draws: Vec<DrawReport>,
}

#[derive(Debug, Serialize)]
pub struct FrameReport {
    pub seed: u64,
    pub focus: [f32; 2],
    pub chunks_visited: u32,
    pub chunks_drawn: u32,
    pub draws: u32,
    pub instances: u32,
    pub chunks: Vec<ChunkReport>,
}

/// Per-chunk draw plan for the terrain's current visible window.
pub fn frame_report(
    terrain: &Terrain,
    registry: &BlockTypeRegistry,
    animations: &BlockAnimations,
    focus: [f32; 2],
    stats: FrameStats,
) -> FrameReport {
    let chunks = terrain
        .visible_chunks()
        .map(|chunk| {
            let coord = chunk.coord();
            let draws = chunk
                .uploaded()
                .map(|uploaded| {
                    ChunkBatcher::plan(uploaded.counts(), registry)
                        .into_iter()
                        .map(|batch| DrawReport {
                            block: registry.name(batch.block).unwrap_or("?").to_string(),
                            base_instance: batch.instances.start,
                            count: batch.instances.end - batch.instances.start,
                            frame: animations.current_frame(batch.block),
                        })
                        .collect()
                })
                .unwrap_or_default();
            ChunkReport {
                chunk: [coord.x, coord.y],
                uploaded: chunk.uploaded().is_some(),
                draws,
            }
        })
        .collect();

    FrameReport {
        seed: terrain.config().seed,
        focus,
        chunks_visited: stats.chunks_visited,
        chunks_drawn: stats.chunks_drawn,
        draws: stats.draws,
        instances: stats.instances,
        chunks,
    }
}
