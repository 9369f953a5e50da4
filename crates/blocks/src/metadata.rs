use blockscape_common::MAX_ANIMATION_LENGTH;
use glam::Vec2;

/// Immutable render data shared by every instance of one block type.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderMetadata {
    /// False for types with no visual (air). Such types are never packed or drawn.
    pub renderable: bool,
    /// Sprite sheet size in pixels.
    pub texture_size: Vec2,
    /// One tile's size in pixels.
    pub tile_size: Vec2,
    /// Pulled off the tile size so bilinear sampling stays inside the tile.
    pub shrink_epsilon: f32,
    /// Tile-unit offset of each animation frame. Entries past `frame_count` are zero.
    pub uv_offsets: [Vec2; MAX_ANIMATION_LENGTH],
    pub frame_count: u32,
    /// Seconds per frame.
    pub frame_duration: f32,
}

impl RenderMetadata {
    /// Sentinel returned for types with no visual representation.
    pub const NONE: RenderMetadata = RenderMetadata {
        renderable: false,
        texture_size: Vec2::ZERO,
        tile_size: Vec2::ZERO,
        shrink_epsilon: 0.0,
        uv_offsets: [Vec2::ZERO; MAX_ANIMATION_LENGTH],
        frame_count: 0,
        frame_duration: 0.0,
    };

    /// `texture_size / (tile_size - shrink_epsilon)`.
    pub fn uv_scale(&self) -> Vec2 {
        self.texture_size / (self.tile_size - Vec2::splat(self.shrink_epsilon))
    }

    pub fn is_animated(&self) -> bool {
        self.frame_count > 1
    }

    /// Frame shown after `elapsed` seconds.
    pub fn frame_at(&self, elapsed: f32) -> u32 {
        if !self.is_animated() || self.frame_duration <= 0.0 {
            return 0;
        }
        (elapsed / self.frame_duration) as u32 % self.frame_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RenderMetadata {
        let mut uv_offsets = [Vec2::ZERO; MAX_ANIMATION_LENGTH];
        uv_offsets[1] = Vec2::new(1.0, 0.0);
        uv_offsets[2] = Vec2::new(2.0, 0.0);
        RenderMetadata {
            renderable: true,
            texture_size: Vec2::new(64.0, 32.0),
            tile_size: Vec2::new(16.0, 16.0),
            shrink_epsilon: 0.5,
            uv_offsets,
            frame_count: 3,
            frame_duration: 0.25,
        }
    }

    #[test]
    fn uv_scale_uses_shrunk_tile() {
        let scale = sample().uv_scale();
        assert_eq!(scale, Vec2::new(64.0 / 15.5, 32.0 / 15.5));
    }

    #[test]
    fn frames_wrap() {
        let meta = sample();
        assert_eq!(meta.frame_at(0.0), 0);
        assert_eq!(meta.frame_at(0.3), 1);
        assert_eq!(meta.frame_at(0.6), 2);
        assert_eq!(meta.frame_at(0.8), 0);
    }

    #[test]
    fn static_tile_stays_on_first_frame() {
        let mut meta = sample();
        meta.frame_count = 1;
        assert_eq!(meta.frame_at(100.0), 0);
        assert_eq!(RenderMetadata::NONE.frame_at(1.0), 0);
    }
}
