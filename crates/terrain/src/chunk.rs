use blockscape_blocks::BlockTypeRegistry;
use blockscape_common::{
    BlockCoord, BlockType, CHUNK_VOLUME, ChunkCoord, GpuResources, InstanceBufferHandle,
    InstanceRaw, LocalCoord,
};
use std::ops::Range;

/// Errors from chunk edits.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChunkError {
    #[error("local coordinate {0:?} is outside the chunk")]
    OutOfBounds(LocalCoord),
    #[error("block type {0:?} is not in the registry")]
    UnknownBlock(BlockType),
    #[error("expected {expected} cells, got {actual}")]
    CellCount { expected: usize, actual: usize },
}

/// One packed instance: a renderable block at a cell of the chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockInstance {
    pub block: BlockType,
    pub local: LocalCoord,
    /// Animation phase, in frames.
    pub phase: u32,
}

/// The GPU-side copy of a chunk: the instance buffer plus the counts it was filled from.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedInstances {
    buffer: InstanceBufferHandle,
    counts: Vec<u32>,
}

impl UploadedInstances {
    /// `InstanceBufferHandle::NONE` when nothing renderable was uploaded yet.
    pub fn buffer(&self) -> InstanceBufferHandle {
        self.buffer
    }

    /// Per-type counts, indexed by type order, matching the buffer layout.
    pub fn counts(&self) -> &[u32] {
        &self.counts
    }
}

/// A fixed-size grid of blocks with a type-contiguous instance array.
///
/// Every mutation rebuilds the count table and the packed instances in the
/// same call. GPU publication is explicit through `sync_gpu`.
#[derive(Debug, Clone)]
pub struct Chunk {
    coord: ChunkCoord,
    cells: Vec<BlockType>,
    counts: Vec<u32>,
    instances: Vec<BlockInstance>,
    uploaded: Option<UploadedInstances>,
    dirty: bool,
}

impl Chunk {
    /// A chunk filled with the registry's base type.
    pub fn new(coord: ChunkCoord, registry: &BlockTypeRegistry) -> Self {
        let mut chunk = Self {
            coord,
            cells: vec![registry.base_type(); CHUNK_VOLUME],
            counts: Vec::new(),
            instances: Vec::new(),
            uploaded: None,
            dirty: true,
        };
        chunk.repack(registry);
        chunk
    }

    /// Build a chunk from row-major cells.
    pub fn from_cells(
        coord: ChunkCoord,
        cells: Vec<BlockType>,
        registry: &BlockTypeRegistry,
    ) -> Result<Self, ChunkError> {
        if cells.len() != CHUNK_VOLUME {
            return Err(ChunkError::CellCount {
                expected: CHUNK_VOLUME,
                actual: cells.len(),
            });
        }
        if let Some(bad) = cells.iter().find(|b| !registry.contains(**b)) {
            return Err(ChunkError::UnknownBlock(*bad));
        }
        let mut chunk = Self {
            coord,
            cells,
            counts: Vec::new(),
            instances: Vec::new(),
            uploaded: None,
            dirty: true,
        };
        chunk.repack(registry);
        Ok(chunk)
    }

    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    pub fn block(&self, local: LocalCoord) -> Option<BlockType> {
        local.in_bounds().then(|| self.cells[local.index()])
    }

    pub fn set_block(
        &mut self,
        local: LocalCoord,
        block: BlockType,
        registry: &BlockTypeRegistry,
    ) -> Result<(), ChunkError> {
        self.set_blocks([(local, block)], registry)
    }

    /// Apply several edits and repack once. Nothing is applied if any edit is invalid.
    pub fn set_blocks(
        &mut self,
        edits: impl IntoIterator<Item = (LocalCoord, BlockType)>,
        registry: &BlockTypeRegistry,
    ) -> Result<(), ChunkError> {
        let edits: Vec<_> = edits.into_iter().collect();
        for &(local, block) in &edits {
            if !local.in_bounds() {
                return Err(ChunkError::OutOfBounds(local));
            }
            if !registry.contains(block) {
                return Err(ChunkError::UnknownBlock(block));
            }
        }
        for (local, block) in edits {
            self.cells[local.index()] = block;
        }
        self.repack(registry);
        Ok(())
    }

    pub fn fill(
        &mut self,
        block: BlockType,
        registry: &BlockTypeRegistry,
    ) -> Result<(), ChunkError> {
        if !registry.contains(block) {
            return Err(ChunkError::UnknownBlock(block));
        }
        self.cells.fill(block);
        self.repack(registry);
        Ok(())
    }

    /// Per-type cell counts in type order, including non-renderable types.
    pub fn instance_counts(&self) -> &[u32] {
        &self.counts
    }

    /// Packed renderable instances, grouped by type in ascending type order.
    pub fn instances(&self) -> &[BlockInstance] {
        &self.instances
    }

    /// Instance range of each renderable type present in the chunk.
    pub fn type_ranges(&self, registry: &BlockTypeRegistry) -> Vec<(BlockType, Range<u32>)> {
        let mut ranges = Vec::new();
        let mut start = 0;
        for (index, &count) in self.counts.iter().enumerate() {
            let block = BlockType::from(index);
            if !registry.is_renderable(block) {
                continue;
            }
            if count > 0 {
                ranges.push((block, start..start + count));
            }
            start += count;
        }
        ranges
    }

    /// GPU copy, if the chunk has been uploaded.
    pub fn uploaded(&self) -> Option<&UploadedInstances> {
        self.uploaded.as_ref()
    }

    /// True when the CPU data changed since the last upload.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Instance records in packed order, as stored in the GPU buffer.
    pub fn raw_instances(&self) -> Vec<InstanceRaw> {
        self.instances
            .iter()
            .map(|inst| {
                let world = BlockCoord::from_parts(self.coord, inst.local);
                InstanceRaw::new(world.center(), inst.phase)
            })
            .collect()
    }

    /// Publish the packed instances to the GPU if they changed.
    /// Returns true when an upload happened.
    pub fn sync_gpu(&mut self, gpu: &mut impl GpuResources) -> bool {
        if !self.dirty {
            return false;
        }
        let raw = self.raw_instances();
        let buffer = match self.uploaded.as_ref().map(UploadedInstances::buffer) {
            Some(buffer) if buffer.is_valid() => {
                gpu.write_instance_buffer(buffer, &raw);
                buffer
            }
            _ if raw.is_empty() => InstanceBufferHandle::NONE,
            _ => gpu.create_instance_buffer(&raw),
        };
        self.uploaded = Some(UploadedInstances {
            buffer,
            counts: self.counts.clone(),
        });
        self.dirty = false;
        tracing::trace!(chunk = ?self.coord, instances = raw.len(), "chunk uploaded");
        true
    }

    /// Drop the GPU copy. The chunk will upload again on the next `sync_gpu`.
    pub fn release_gpu(&mut self, gpu: &mut impl GpuResources) {
        if let Some(uploaded) = self.uploaded.take() {
            if uploaded.buffer.is_valid() {
                gpu.destroy_instance_buffer(uploaded.buffer);
            }
        }
        self.dirty = true;
    }

    /// Counting sort of the cells by type. Row-major order is kept within a type.
    fn repack(&mut self, registry: &BlockTypeRegistry) {
        let mut counts = vec![0u32; registry.len()];
        for block in &self.cells {
            counts[block.index()] += 1;
        }

        let mut next = vec![0usize; counts.len()];
        let mut packed = 0usize;
        for (index, &count) in counts.iter().enumerate() {
            next[index] = packed;
            if registry.is_renderable(BlockType::from(index)) {
                packed += count as usize;
            }
        }

        let mut instances = vec![
            BlockInstance {
                block: registry.base_type(),
                local: LocalCoord::new(0, 0),
                phase: 0,
            };
            packed
        ];
        for (cell, &block) in self.cells.iter().enumerate() {
            let meta = registry.metadata_for(block);
            if !meta.renderable {
                continue;
            }
            let local = LocalCoord::from_index(cell);
            let slot = &mut next[block.index()];
            instances[*slot] = BlockInstance {
                block,
                local,
                phase: phase_for(BlockCoord::from_parts(self.coord, local), meta.frame_count),
            };
            *slot += 1;
        }

        self.counts = counts;
        self.instances = instances;
        self.dirty = true;
    }
}

/// Position-derived animation phase so neighbouring blocks do not animate in lockstep.
fn phase_for(block: BlockCoord, frame_count: u32) -> u32 {
    if frame_count <= 1 {
        return 0;
    }
    let mixed = block.0.x.wrapping_mul(7) ^ block.0.y.wrapping_mul(13);
    mixed.rem_euclid(frame_count as i32) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeGpu;
    use blockscape_blocks::builtin;

    fn registry() -> BlockTypeRegistry {
        BlockTypeRegistry::builtin()
    }

    /// Re-derive per-type counts by scanning the packed array for type boundaries.
    fn derive_counts(chunk: &Chunk, types: usize) -> Vec<u32> {
        let mut counts = vec![0u32; types];
        let mut last: Option<BlockType> = None;
        for inst in chunk.instances() {
            if let Some(prev) = last {
                assert!(prev <= inst.block, "instances not in ascending type order");
            }
            counts[inst.block.index()] += 1;
            last = Some(inst.block);
        }
        counts
    }

    #[test]
    fn new_chunk_is_all_base() {
        let reg = registry();
        let chunk = Chunk::new(ChunkCoord::new(0, 0), &reg);
        assert_eq!(chunk.instance_counts()[builtin::AIR.index()], CHUNK_VOLUME as u32);
        assert!(chunk.instances().is_empty());
        assert!(chunk.type_ranges(&reg).is_empty());
    }

    #[test]
    fn packing_groups_by_type() {
        let reg = registry();
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0), &reg);
        chunk
            .set_blocks(
                [
                    (LocalCoord::new(5, 0), builtin::STONE),
                    (LocalCoord::new(1, 0), builtin::DIRT),
                    (LocalCoord::new(2, 3), builtin::STONE),
                    (LocalCoord::new(0, 0), builtin::DIRT),
                    (LocalCoord::new(9, 9), builtin::DIRT),
                ],
                &reg,
            )
            .unwrap();

        let types: Vec<_> = chunk.instances().iter().map(|i| i.block).collect();
        assert_eq!(
            types,
            vec![builtin::DIRT, builtin::DIRT, builtin::DIRT, builtin::STONE, builtin::STONE]
        );
        // Row-major order within a type.
        assert_eq!(chunk.instances()[0].local, LocalCoord::new(0, 0));
        assert_eq!(chunk.instances()[1].local, LocalCoord::new(1, 0));
        assert_eq!(chunk.instances()[2].local, LocalCoord::new(9, 9));
        assert_eq!(
            chunk.type_ranges(&reg),
            vec![(builtin::DIRT, 0..3), (builtin::STONE, 3..5)]
        );
    }

    #[test]
    fn counts_survive_repacking() {
        let reg = registry();
        let mut chunk = Chunk::new(ChunkCoord::new(-2, 1), &reg);
        let palette = [builtin::AIR, builtin::DIRT, builtin::GRASS, builtin::STONE, builtin::WATER];
        for step in 0..40u32 {
            let local = LocalCoord::new((step * 7) % 16, (step * 3) % 16);
            let block = palette[(step as usize * 5 + 3) % palette.len()];
            chunk.set_block(local, block, &reg).unwrap();

            let derived = derive_counts(&chunk, reg.len());
            for t in reg.types() {
                if reg.is_renderable(t) {
                    assert_eq!(derived[t.index()], chunk.instance_counts()[t.index()]);
                } else {
                    assert_eq!(derived[t.index()], 0);
                }
            }
            let total: u32 = chunk.instance_counts().iter().sum();
            assert_eq!(total as usize, CHUNK_VOLUME);
            for inst in chunk.instances() {
                assert_eq!(chunk.block(inst.local), Some(inst.block));
            }
        }
    }

    #[test]
    fn rejected_edit_leaves_chunk_untouched() {
        let reg = registry();
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0), &reg);
        let err = chunk
            .set_blocks(
                [
                    (LocalCoord::new(0, 0), builtin::DIRT),
                    (LocalCoord::new(16, 0), builtin::DIRT),
                ],
                &reg,
            )
            .unwrap_err();
        assert_eq!(err, ChunkError::OutOfBounds(LocalCoord::new(16, 0)));
        assert_eq!(chunk.block(LocalCoord::new(0, 0)), Some(builtin::AIR));

        assert_eq!(
            chunk.set_block(LocalCoord::new(0, 0), BlockType(77), &reg),
            Err(ChunkError::UnknownBlock(BlockType(77)))
        );
    }

    #[test]
    fn from_cells_validates_length() {
        let reg = registry();
        let err =
            Chunk::from_cells(ChunkCoord::new(0, 0), vec![builtin::AIR; 3], &reg).unwrap_err();
        assert_eq!(
            err,
            ChunkError::CellCount {
                expected: CHUNK_VOLUME,
                actual: 3
            }
        );
    }

    #[test]
    fn sync_publishes_counts_with_buffer() {
        let reg = registry();
        let mut gpu = FakeGpu::default();
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0), &reg);
        chunk.set_block(LocalCoord::new(0, 0), builtin::DIRT, &reg).unwrap();

        assert!(chunk.sync_gpu(&mut gpu));
        assert!(!chunk.sync_gpu(&mut gpu));
        let uploaded = chunk.uploaded().unwrap().clone();
        assert!(uploaded.buffer().is_valid());
        assert_eq!(uploaded.counts(), chunk.instance_counts());
        assert_eq!(gpu.len(uploaded.buffer()), Some(1));

        // Edits stay invisible to the GPU copy until the next sync.
        chunk.set_block(LocalCoord::new(1, 0), builtin::DIRT, &reg).unwrap();
        assert!(chunk.is_dirty());
        assert_eq!(chunk.uploaded().unwrap().counts()[builtin::DIRT.index()], 1);

        chunk.sync_gpu(&mut gpu);
        assert_eq!(chunk.uploaded().unwrap().buffer(), uploaded.buffer());
        assert_eq!(chunk.uploaded().unwrap().counts()[builtin::DIRT.index()], 2);
        assert_eq!(gpu.len(uploaded.buffer()), Some(2));
    }

    #[test]
    fn empty_chunk_uploads_without_buffer() {
        let reg = registry();
        let mut gpu = FakeGpu::default();
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0), &reg);
        chunk.sync_gpu(&mut gpu);
        assert_eq!(chunk.uploaded().unwrap().buffer(), InstanceBufferHandle::NONE);
        assert_eq!(gpu.live(), 0);
    }

    #[test]
    fn release_destroys_buffer() {
        let reg = registry();
        let mut gpu = FakeGpu::default();
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0), &reg);
        chunk.fill(builtin::STONE, &reg).unwrap();
        chunk.sync_gpu(&mut gpu);
        assert_eq!(gpu.live(), 1);

        chunk.release_gpu(&mut gpu);
        assert_eq!(gpu.live(), 0);
        assert!(chunk.uploaded().is_none());
        assert!(chunk.is_dirty());
    }

    #[test]
    fn raw_instances_are_world_centers() {
        let reg = registry();
        let mut chunk = Chunk::new(ChunkCoord::new(1, -1), &reg);
        chunk.set_block(LocalCoord::new(2, 3), builtin::GRASS, &reg).unwrap();
        let raw = chunk.raw_instances();
        let expected = BlockCoord::new(18, -13).center();
        assert_eq!(raw[0].position, expected.to_array());
        assert_eq!(raw[0].phase, 0);
    }

    #[test]
    fn animated_phase_is_within_frames() {
        let reg = registry();
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0), &reg);
        chunk.fill(builtin::WATER, &reg).unwrap();
        let frames = reg.metadata_for(builtin::WATER).frame_count;
        assert!(chunk.instances().iter().all(|i| i.phase < frames));
        assert!(chunk.instances().iter().any(|i| i.phase != 0));
    }
}
