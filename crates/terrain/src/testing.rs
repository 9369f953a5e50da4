use blockscape_common::{GpuResources, InstanceBufferHandle, InstanceRaw};
use std::collections::HashMap;

/// In-memory buffer bookkeeping for chunk and terrain tests.
#[derive(Debug, Default)]
pub(crate) struct FakeGpu {
    next: u32,
    buffers: HashMap<InstanceBufferHandle, usize>,
}

impl FakeGpu {
    pub(crate) fn len(&self, buffer: InstanceBufferHandle) -> Option<usize> {
        self.buffers.get(&buffer).copied()
    }

    pub(crate) fn live(&self) -> usize {
        self.buffers.len()
    }
}

impl GpuResources for FakeGpu {
    fn create_instance_buffer(&mut self, data: &[InstanceRaw]) -> InstanceBufferHandle {
        self.next += 1;
        let handle = InstanceBufferHandle(self.next);
        self.buffers.insert(handle, data.len());
        handle
    }

    fn write_instance_buffer(&mut self, buffer: InstanceBufferHandle, data: &[InstanceRaw]) {
        self.buffers.insert(buffer, data.len());
    }

    fn destroy_instance_buffer(&mut self, buffer: InstanceBufferHandle) {
        self.buffers.remove(&buffer);
    }
}
