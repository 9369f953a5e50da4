use blockscape_common::{ShaderHandle, TextureHandle};
use std::collections::HashMap;

/// Named GPU assets loaded before the first frame. Absent names resolve to handle 0.
pub trait AssetProvider {
    fn shader(&self, name: &str) -> ShaderHandle;
    fn texture(&self, name: &str) -> TextureHandle;
}

/// Name-to-handle table filled by whoever created the GPU objects.
#[derive(Debug, Clone, Default)]
pub struct AssetTable {
    shaders: HashMap<String, ShaderHandle>,
    textures: HashMap<String, TextureHandle>,
}

impl AssetTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_shader(&mut self, name: impl Into<String>, shader: ShaderHandle) {
        self.shaders.insert(name.into(), shader);
    }

    pub fn insert_texture(&mut self, name: impl Into<String>, texture: TextureHandle) {
        self.textures.insert(name.into(), texture);
    }

    pub fn with_shader(mut self, name: impl Into<String>, shader: ShaderHandle) -> Self {
        self.insert_shader(name, shader);
        self
    }

    pub fn with_texture(mut self, name: impl Into<String>, texture: TextureHandle) -> Self {
        self.insert_texture(name, texture);
        self
    }
}

impl AssetProvider for AssetTable {
    fn shader(&self, name: &str) -> ShaderHandle {
        self.shaders.get(name).copied().unwrap_or_default()
    }

    fn texture(&self, name: &str) -> TextureHandle {
        self.textures.get(name).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_names_are_absent() {
        let assets = AssetTable::new().with_shader("terrainShader", ShaderHandle(3));
        assert_eq!(assets.shader("terrainShader"), ShaderHandle(3));
        assert!(!assets.shader("other").is_valid());
        assert!(!assets.texture("blockSpritesheet").is_valid());
    }
}
