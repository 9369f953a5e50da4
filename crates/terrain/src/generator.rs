use blockscape_blocks::BlockTypeRegistry;
use blockscape_common::{BlockCoord, BlockType, CHUNK_VOLUME, ChunkCoord, LocalCoord};
use serde::{Deserialize, Serialize};

use crate::chunk::{Chunk, ChunkError};

/// Errors from resolving generator block names.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeneratorError {
    #[error("generator block {0:?} is not in the registry")]
    UnknownBlock(String),
}

/// Shape of the generated height field and the blocks it is built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Mean surface height in blocks.
    pub surface_height: i32,
    /// Maximum deviation from the mean, in blocks.
    pub amplitude: i32,
    /// Distance between height lattice points, in blocks.
    pub wavelength: u32,
    /// Soil layers below the surface block.
    pub dirt_depth: i32,
    /// Air cells at or below this height become fluid.
    pub sea_level: i32,
    pub surface_block: String,
    pub soil_block: String,
    pub rock_block: String,
    pub fluid_block: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            surface_height: 8,
            amplitude: 6,
            wavelength: 24,
            dirt_depth: 3,
            sea_level: 5,
            surface_block: "grass".into(),
            soil_block: "dirt".into(),
            rock_block: "stone".into(),
            fluid_block: Some("water".into()),
        }
    }
}

/// Deterministic side-view terrain: same seed and config, same chunks.
#[derive(Debug, Clone)]
pub struct TerrainGenerator {
    seed: u64,
    config: GeneratorConfig,
    base: BlockType,
    surface: BlockType,
    soil: BlockType,
    rock: BlockType,
    fluid: Option<BlockType>,
}

impl TerrainGenerator {
    pub fn new(
        seed: u64,
        config: GeneratorConfig,
        registry: &BlockTypeRegistry,
    ) -> Result<Self, GeneratorError> {
        let resolve = |name: &str| {
            registry
                .id(name)
                .ok_or_else(|| GeneratorError::UnknownBlock(name.to_string()))
        };
        let surface = resolve(&config.surface_block)?;
        let soil = resolve(&config.soil_block)?;
        let rock = resolve(&config.rock_block)?;
        let fluid = config.fluid_block.as_deref().map(resolve).transpose()?;
        Ok(Self {
            seed,
            base: registry.base_type(),
            surface,
            soil,
            rock,
            fluid,
            config,
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Height of the topmost solid block in column `x`.
    pub fn surface_at(&self, x: i32) -> i32 {
        let wavelength = self.config.wavelength.max(1) as i32;
        let cell = x.div_euclid(wavelength);
        let t = x.rem_euclid(wavelength) as f32 / wavelength as f32;
        let a = self.lattice(cell);
        let b = self.lattice(cell + 1);
        let smooth = t * t * (3.0 - 2.0 * t);
        let noise = a + (b - a) * smooth;
        self.config.surface_height + (noise * self.config.amplitude as f32).round() as i32
    }

    pub fn block_at(&self, block: BlockCoord) -> BlockType {
        let (x, y) = (block.0.x, block.0.y);
        let surface = self.surface_at(x);
        if y > surface {
            return match self.fluid {
                Some(fluid) if y <= self.config.sea_level => fluid,
                _ => self.base,
            };
        }
        if y == surface {
            if surface < self.config.sea_level {
                self.soil
            } else {
                self.surface
            }
        } else if y > surface - self.config.dirt_depth {
            self.soil
        } else {
            self.rock
        }
    }

    pub fn generate(
        &self,
        coord: ChunkCoord,
        registry: &BlockTypeRegistry,
    ) -> Result<Chunk, ChunkError> {
        let cells = (0..CHUNK_VOLUME)
            .map(|i| self.block_at(BlockCoord::from_parts(coord, LocalCoord::from_index(i))))
            .collect();
        Chunk::from_cells(coord, cells, registry)
    }

    /// Lattice value in [-1, 1) for a lattice cell.
    fn lattice(&self, cell: i32) -> f32 {
        let h = splitmix64(self.seed ^ (cell as i64 as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15));
        (h >> 11) as f32 / (1u64 << 53) as f32 * 2.0 - 1.0
    }
}

/// SplitMix64 mixing step.
fn splitmix64(mut state: u64) -> u64 {
    state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockscape_blocks::builtin;

    fn generator(seed: u64) -> TerrainGenerator {
        TerrainGenerator::new(seed, GeneratorConfig::default(), &BlockTypeRegistry::builtin())
            .unwrap()
    }

    #[test]
    fn same_seed_same_terrain() {
        let reg = BlockTypeRegistry::builtin();
        let a = generator(42).generate(ChunkCoord::new(3, 0), &reg).unwrap();
        let b = generator(42).generate(ChunkCoord::new(3, 0), &reg).unwrap();
        assert_eq!(a.instance_counts(), b.instance_counts());
        assert_eq!(a.instances(), b.instances());
    }

    #[test]
    fn surface_stays_within_amplitude() {
        let g = generator(7);
        let config = GeneratorConfig::default();
        for x in -200..200 {
            let h = g.surface_at(x);
            assert!((h - config.surface_height).abs() <= config.amplitude, "x={x} h={h}");
        }
    }

    #[test]
    fn columns_are_layered() {
        let g = generator(9);
        let x = 11;
        let h = g.surface_at(x);
        assert_eq!(g.block_at(BlockCoord::new(x, h - 10)), builtin::STONE);
        assert_eq!(g.block_at(BlockCoord::new(x, h - 1)), builtin::DIRT);
        assert_eq!(g.block_at(BlockCoord::new(x, 100)), builtin::AIR);
        let top = g.block_at(BlockCoord::new(x, h));
        assert!(top == builtin::GRASS || top == builtin::DIRT);
    }

    #[test]
    fn fluid_fills_low_air() {
        let config = GeneratorConfig {
            surface_height: 0,
            amplitude: 0,
            sea_level: 3,
            ..GeneratorConfig::default()
        };
        let g = TerrainGenerator::new(1, config, &BlockTypeRegistry::builtin()).unwrap();
        assert_eq!(g.block_at(BlockCoord::new(0, 0)), builtin::DIRT);
        assert_eq!(g.block_at(BlockCoord::new(0, 2)), builtin::WATER);
        assert_eq!(g.block_at(BlockCoord::new(0, 4)), builtin::AIR);
    }

    #[test]
    fn unknown_block_name_is_rejected() {
        let config = GeneratorConfig {
            rock_block: "granite".into(),
            ..GeneratorConfig::default()
        };
        let err = TerrainGenerator::new(1, config, &BlockTypeRegistry::builtin()).unwrap_err();
        assert_eq!(err, GeneratorError::UnknownBlock("granite".into()));
    }

    #[test]
    fn sky_chunk_is_empty() {
        let reg = BlockTypeRegistry::builtin();
        let chunk = generator(3).generate(ChunkCoord::new(0, 10), &reg).unwrap();
        assert!(chunk.instances().is_empty());
    }
}
