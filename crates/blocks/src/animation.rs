use blockscape_common::BlockType;

use crate::registry::BlockTypeRegistry;

/// Current animation frame of every block type.
///
/// The registry stays immutable; this is the only per-frame animation state.
/// All instances of a type advance together, offset by their own phase.
#[derive(Debug, Clone, Default)]
pub struct BlockAnimations {
    elapsed: f32,
    frames: Vec<u32>,
}

impl BlockAnimations {
    pub fn new(registry: &BlockTypeRegistry) -> Self {
        Self {
            elapsed: 0.0,
            frames: vec![0; registry.len()],
        }
    }

    /// Advance the clock by `dt` seconds and recompute every type's frame.
    pub fn tick(&mut self, dt: f32, registry: &BlockTypeRegistry) {
        self.elapsed += dt.max(0.0);
        self.frames.resize(registry.len(), 0);
        for (block, frame) in registry.types().zip(self.frames.iter_mut()) {
            *frame = registry.metadata_for(block).frame_at(self.elapsed);
        }
    }

    /// Frame index for a type. Unknown types report frame 0.
    pub fn current_frame(&self, block: BlockType) -> u32 {
        self.frames.get(block.index()).copied().unwrap_or(0)
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin;

    #[test]
    fn animated_type_advances() {
        let registry = BlockTypeRegistry::builtin();
        let mut anim = BlockAnimations::new(&registry);
        assert_eq!(anim.current_frame(builtin::WATER), 0);

        anim.tick(0.3, &registry);
        assert_eq!(anim.current_frame(builtin::WATER), 1);
        assert_eq!(anim.current_frame(builtin::DIRT), 0);

        anim.tick(0.8, &registry);
        // 1.1s at 0.25s per frame over 4 frames
        assert_eq!(anim.current_frame(builtin::WATER), 0);
    }

    #[test]
    fn negative_dt_is_ignored() {
        let registry = BlockTypeRegistry::builtin();
        let mut anim = BlockAnimations::new(&registry);
        anim.tick(-5.0, &registry);
        assert_eq!(anim.elapsed(), 0.0);
        assert_eq!(anim.current_frame(BlockType(200)), 0);
    }
}
