use blockscape_blocks::{BlockAnimations, BlockTypeRegistry};
use blockscape_common::BlockType;
use blockscape_terrain::Chunk;
use std::ops::Range;

use crate::context::{BlockUniforms, RenderContext};

/// One instanced draw: a block type and its slice of the chunk's instance buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawBatch {
    pub block: BlockType,
    /// `start` is the base instance, `len()` the instance count.
    pub instances: Range<u32>,
}

/// What drawing one chunk issued.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChunkDrawStats {
    pub draws: u32,
    pub instances: u32,
}

/// Turns a chunk's per-type counts into one instanced draw per present type.
///
/// Reuses its batch list across chunks to avoid per-frame allocation.
#[derive(Debug, Default)]
pub struct ChunkBatcher {
    batches: Vec<DrawBatch>,
}

impl ChunkBatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute the draws for a count table. Returns the final cumulative offset,
    /// which equals the number of packed instances.
    ///
    /// Types are walked in ascending order. Non-renderable types (the base type
    /// included) are not packed, so they neither draw nor advance the offset.
    /// Empty renderable types are skipped without changing any later offset.
    pub fn plan_into(
        batches: &mut Vec<DrawBatch>,
        counts: &[u32],
        registry: &BlockTypeRegistry,
    ) -> u32 {
        batches.clear();
        let mut offset = 0u32;
        for (index, &count) in counts.iter().enumerate() {
            let block = BlockType::from(index);
            if block == registry.base_type() || !registry.is_renderable(block) {
                continue;
            }
            if count > 0 {
                batches.push(DrawBatch {
                    block,
                    instances: offset..offset + count,
                });
            }
            offset += count;
        }
        offset
    }

    /// Draw list for a count table.
    pub fn plan(counts: &[u32], registry: &BlockTypeRegistry) -> Vec<DrawBatch> {
        let mut batches = Vec::new();
        Self::plan_into(&mut batches, counts, registry);
        batches
    }

    /// Issue the draws for one chunk's uploaded instances.
    ///
    /// The chunk's buffer is bound once; for each batch the type's uniforms are
    /// uploaded and then its instanced draw issued. Chunks with nothing to draw
    /// (or never uploaded) bind nothing.
    pub fn draw(
        &mut self,
        ctx: &mut impl RenderContext,
        chunk: &Chunk,
        registry: &BlockTypeRegistry,
        animations: &BlockAnimations,
    ) -> ChunkDrawStats {
        let Some(uploaded) = chunk.uploaded() else {
            tracing::debug!(chunk = ?chunk.coord(), "chunk not uploaded, skipping");
            return ChunkDrawStats::default();
        };

        let total = Self::plan_into(&mut self.batches, uploaded.counts(), registry);
        if self.batches.is_empty() {
            return ChunkDrawStats::default();
        }

        ctx.bind_instances(uploaded.buffer());
        for batch in &self.batches {
            let meta = registry.metadata_for(batch.block);
            let uniforms = BlockUniforms::new(meta, animations.current_frame(batch.block));
            ctx.set_block_uniforms(&uniforms);
            ctx.draw_quads(batch.instances.clone());
            tracing::trace!(
                chunk = ?chunk.coord(),
                block = batch.block.0,
                base = batch.instances.start,
                count = batch.instances.len(),
                "draw"
            );
        }

        ChunkDrawStats {
            draws: self.batches.len() as u32,
            instances: total,
        }
    }
}
