use glam::{IVec2, UVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::{BLOCK_SIZE, CHUNK_HEIGHT, CHUNK_WIDTH};

/// Dense block type identifier. The registry assigns ids in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct BlockType(pub u16);

impl BlockType {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<usize> for BlockType {
    fn from(index: usize) -> Self {
        Self(index as u16)
    }
}

/// Chunk position in chunk units. Chunk `(x, y)` covers blocks
/// `x * CHUNK_WIDTH .. (x + 1) * CHUNK_WIDTH` horizontally, Y pointing up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub x: i32,
    pub y: i32,
}

impl ChunkCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// World block coordinate of the chunk's bottom-left cell.
    pub fn origin(self) -> BlockCoord {
        BlockCoord::new(self.x * CHUNK_WIDTH as i32, self.y * CHUNK_HEIGHT as i32)
    }

    /// Chunk containing a world-space point.
    pub fn from_world(pos: Vec2) -> Self {
        BlockCoord::from_world(pos).chunk()
    }
}

/// Cell position inside a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocalCoord(pub UVec2);

impl LocalCoord {
    pub fn new(x: u32, y: u32) -> Self {
        Self(UVec2::new(x, y))
    }

    pub fn in_bounds(self) -> bool {
        self.0.x < CHUNK_WIDTH && self.0.y < CHUNK_HEIGHT
    }

    /// Row-major cell index. Only meaningful when `in_bounds`.
    pub fn index(self) -> usize {
        (self.0.y * CHUNK_WIDTH + self.0.x) as usize
    }

    pub fn from_index(index: usize) -> Self {
        let index = index as u32;
        Self::new(index % CHUNK_WIDTH, index / CHUNK_WIDTH)
    }
}

/// Absolute block position in the world grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockCoord(pub IVec2);

impl BlockCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self(IVec2::new(x, y))
    }

    pub fn from_world(pos: Vec2) -> Self {
        let cell = (pos / BLOCK_SIZE).floor();
        Self::new(cell.x as i32, cell.y as i32)
    }

    pub fn chunk(self) -> ChunkCoord {
        ChunkCoord::new(
            self.0.x.div_euclid(CHUNK_WIDTH as i32),
            self.0.y.div_euclid(CHUNK_HEIGHT as i32),
        )
    }

    pub fn local(self) -> LocalCoord {
        LocalCoord::new(
            self.0.x.rem_euclid(CHUNK_WIDTH as i32) as u32,
            self.0.y.rem_euclid(CHUNK_HEIGHT as i32) as u32,
        )
    }

    pub fn from_parts(chunk: ChunkCoord, local: LocalCoord) -> Self {
        let origin = chunk.origin();
        Self(origin.0 + local.0.as_ivec2())
    }

    /// World-space center of the block.
    pub fn center(self) -> Vec2 {
        (self.0.as_vec2() + Vec2::splat(0.5)) * BLOCK_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_blocks_map_to_negative_chunks() {
        let b = BlockCoord::new(-1, -17);
        assert_eq!(b.chunk(), ChunkCoord::new(-1, -2));
        assert_eq!(b.local(), LocalCoord::new(15, 15));
    }

    #[test]
    fn parts_round_trip() {
        let b = BlockCoord::new(37, -5);
        assert_eq!(BlockCoord::from_parts(b.chunk(), b.local()), b);
    }

    #[test]
    fn local_index_is_row_major() {
        let l = LocalCoord::new(3, 2);
        assert_eq!(l.index(), 2 * CHUNK_WIDTH as usize + 3);
        assert_eq!(LocalCoord::from_index(l.index()), l);
        assert!(!LocalCoord::new(CHUNK_WIDTH, 0).in_bounds());
    }

    #[test]
    fn world_point_to_chunk() {
        let c = ChunkCoord::from_world(Vec2::new(-0.5, 300.0));
        assert_eq!(c, ChunkCoord::new(-1, 1));
        assert_eq!(BlockCoord::new(0, 0).center(), Vec2::splat(BLOCK_SIZE / 2.0));
    }
}
