use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
        pub struct $name(pub u32);

        impl $name {
            /// The "absent" handle.
            pub const NONE: Self = Self(0);

            pub fn is_valid(self) -> bool {
                self.0 != 0
            }
        }
    };
}

handle!(
    /// Compiled shader program.
    ShaderHandle
);
handle!(
    /// Sampled 2D texture (the block sprite sheet).
    TextureHandle
);
handle!(
    /// GPU buffer of `InstanceRaw` records owned by one chunk.
    InstanceBufferHandle
);

/// Per-instance data read by the terrain vertex shader.
///
/// Layout: `position` at shader location 2, `phase` at location 3.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct InstanceRaw {
    /// World-space center of the block.
    pub position: [f32; 2],
    /// Animation phase added to the type's current frame.
    pub phase: u32,
    pub _padding: u32,
}

impl InstanceRaw {
    pub fn new(position: glam::Vec2, phase: u32) -> Self {
        Self {
            position: position.to_array(),
            phase,
            _padding: 0,
        }
    }
}

/// GPU buffer management used by chunks to publish their packed instances.
///
/// Implemented by every render backend, including the recording context
/// used in tests.
pub trait GpuResources {
    /// Allocate a buffer filled with `data`. Never returns `InstanceBufferHandle::NONE`.
    fn create_instance_buffer(&mut self, data: &[InstanceRaw]) -> InstanceBufferHandle;

    /// Replace the contents of an existing buffer. The buffer may grow.
    fn write_instance_buffer(&mut self, buffer: InstanceBufferHandle, data: &[InstanceRaw]);

    /// Release a buffer. Using the handle afterwards is a caller bug.
    fn destroy_instance_buffer(&mut self, buffer: InstanceBufferHandle);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_handle_is_absent() {
        assert!(!ShaderHandle::NONE.is_valid());
        assert!(!TextureHandle::default().is_valid());
        assert!(InstanceBufferHandle(3).is_valid());
    }

    #[test]
    fn instance_raw_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<InstanceRaw>(), 16);
        let raw = InstanceRaw::new(glam::Vec2::new(8.0, 24.0), 2);
        assert_eq!(raw.position, [8.0, 24.0]);
        assert_eq!(bytemuck::bytes_of(&raw).len(), 16);
    }
}
