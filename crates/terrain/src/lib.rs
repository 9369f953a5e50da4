//! Terrain: chunked block storage and the visible chunk window.
//!
//! # Invariants
//! - A chunk's packed instances are grouped by block type in ascending type
//!   order with no gaps; its count table always matches that layout.
//! - Non-renderable types are counted but never packed.
//! - The GPU copy of a chunk is published together with the counts it was
//!   built from, so a reader never sees one without the other.

mod chunk;
mod generator;
mod terrain;

#[cfg(test)]
mod testing;

pub use chunk::{BlockInstance, Chunk, ChunkError, UploadedInstances};
pub use generator::{GeneratorConfig, GeneratorError, TerrainGenerator};
pub use terrain::{StreamStats, Terrain, TerrainConfig, TerrainError};

pub fn crate_info() -> &'static str {
    "blockscape-terrain v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("terrain"));
    }
}
