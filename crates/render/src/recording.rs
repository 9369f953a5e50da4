use blockscape_common::{GpuResources, InstanceBufferHandle, InstanceRaw, ShaderHandle, TextureHandle};
use glam::{Mat4, Vec4};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::ops::Range;

use crate::context::{BlockUniforms, RenderCommand, RenderContext};

/// A binding-order rule broken by a recorded command stream.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OrderViolation {
    #[error("command {index}: uniform upload before any shader bind")]
    UniformBeforeShader { index: usize },
    #[error("command {index}: draw without a bound shader")]
    NoShader { index: usize },
    #[error("command {index}: draw before projection and view were uploaded")]
    NoCamera { index: usize },
    #[error("command {index}: draw without a bound texture")]
    NoTexture { index: usize },
    #[error("command {index}: draw without a bound instance buffer")]
    NoInstances { index: usize },
    #[error("command {index}: draw without block uniforms since the last instance bind")]
    StaleBlockUniforms { index: usize },
    #[error("command {index}: handle {handle:?} is not a live buffer")]
    UnknownBuffer {
        index: usize,
        handle: InstanceBufferHandle,
    },
    #[error("command {index}: instances {range:?} exceed buffer length {len}")]
    OutOfBounds {
        index: usize,
        range: Range<u32>,
        len: usize,
    },
}

/// A `RenderContext` that records every call in order and keeps buffers in memory.
///
/// Used by tests to assert call order, and by the CLI to dump a frame's draw plan.
#[derive(Debug, Default)]
pub struct RecordingContext {
    commands: Vec<RenderCommand>,
    buffers: BTreeMap<InstanceBufferHandle, Vec<InstanceRaw>>,
    next_buffer: u32,
}

impl RecordingContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Take the recorded commands, keeping buffers alive.
    pub fn take_commands(&mut self) -> Vec<RenderCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    /// Instance ranges of every draw, in issue order.
    pub fn draws(&self) -> Vec<Range<u32>> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                RenderCommand::DrawQuads(range) => Some(range.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of recorded commands matching `pred`.
    pub fn count(&self, pred: impl Fn(&RenderCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }

    pub fn buffer(&self, handle: InstanceBufferHandle) -> Option<&[InstanceRaw]> {
        self.buffers.get(&handle).map(Vec::as_slice)
    }

    pub fn live_buffers(&self) -> usize {
        self.buffers.len()
    }

    /// Walk the recorded stream and check the binding-order contract plus
    /// instance ranges against current buffer lengths.
    pub fn verify(&self) -> Result<(), OrderViolation> {
        let mut shader = false;
        let mut projection = false;
        let mut view = false;
        let mut texture = false;
        let mut instances: Option<InstanceBufferHandle> = None;
        let mut block_uniforms = false;

        for (index, command) in self.commands.iter().enumerate() {
            match command {
                RenderCommand::BindShader(_) => {
                    shader = true;
                    projection = false;
                    view = false;
                    block_uniforms = false;
                }
                RenderCommand::SetProjection(_)
                | RenderCommand::SetView(_)
                | RenderCommand::SetTint(_)
                | RenderCommand::SetBlockUniforms(_)
                    if !shader =>
                {
                    return Err(OrderViolation::UniformBeforeShader { index });
                }
                RenderCommand::SetProjection(_) => projection = true,
                RenderCommand::SetView(_) => view = true,
                RenderCommand::SetTint(_) => {}
                RenderCommand::BindTexture(_) => texture = true,
                RenderCommand::BindInstances(handle) => {
                    if !self.buffers.contains_key(handle) {
                        return Err(OrderViolation::UnknownBuffer {
                            index,
                            handle: *handle,
                        });
                    }
                    instances = Some(*handle);
                    block_uniforms = false;
                }
                RenderCommand::SetBlockUniforms(_) => block_uniforms = true,
                RenderCommand::DrawQuads(range) => {
                    if !shader {
                        return Err(OrderViolation::NoShader { index });
                    }
                    if !(projection && view) {
                        return Err(OrderViolation::NoCamera { index });
                    }
                    if !texture {
                        return Err(OrderViolation::NoTexture { index });
                    }
                    let Some(handle) = instances else {
                        return Err(OrderViolation::NoInstances { index });
                    };
                    if !block_uniforms {
                        return Err(OrderViolation::StaleBlockUniforms { index });
                    }
                    let len = self.buffers.get(&handle).map_or(0, Vec::len);
                    if range.end as usize > len || range.start > range.end {
                        return Err(OrderViolation::OutOfBounds {
                            index,
                            range: range.clone(),
                            len,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Human-readable listing of the recorded commands, one per line.
    pub fn transcript(&self) -> String {
        let mut out = String::new();
        for (i, command) in self.commands.iter().enumerate() {
            let line = match command {
                RenderCommand::BindShader(s) => format!("bind_shader {}", s.0),
                RenderCommand::SetProjection(_) => "set_projection".to_string(),
                RenderCommand::SetView(_) => "set_view".to_string(),
                RenderCommand::SetTint(t) => {
                    format!("set_tint ({:.2}, {:.2}, {:.2}, {:.2})", t.x, t.y, t.z, t.w)
                }
                RenderCommand::BindTexture(t) => format!("bind_texture {}", t.0),
                RenderCommand::BindInstances(b) => format!("bind_instances {}", b.0),
                RenderCommand::SetBlockUniforms(u) => format!(
                    "set_block_uniforms scale=({:.3}, {:.3}) frame={}/{}",
                    u.uv_scale[0], u.uv_scale[1], u.current_frame, u.frame_count
                ),
                RenderCommand::DrawQuads(r) => {
                    format!("draw_quads base={} count={}", r.start, r.end - r.start)
                }
            };
            let _ = writeln!(out, "{i:4}  {line}");
        }
        out
    }
}

impl GpuResources for RecordingContext {
    fn create_instance_buffer(&mut self, data: &[InstanceRaw]) -> InstanceBufferHandle {
        self.next_buffer += 1;
        let handle = InstanceBufferHandle(self.next_buffer);
        self.buffers.insert(handle, data.to_vec());
        handle
    }

    fn write_instance_buffer(&mut self, buffer: InstanceBufferHandle, data: &[InstanceRaw]) {
        self.buffers.insert(buffer, data.to_vec());
    }

    fn destroy_instance_buffer(&mut self, buffer: InstanceBufferHandle) {
        self.buffers.remove(&buffer);
    }
}

impl RenderContext for RecordingContext {
    fn bind_shader(&mut self, shader: ShaderHandle) {
        self.commands.push(RenderCommand::BindShader(shader));
    }

    fn set_projection(&mut self, projection: Mat4) {
        self.commands.push(RenderCommand::SetProjection(projection));
    }

    fn set_view(&mut self, view: Mat4) {
        self.commands.push(RenderCommand::SetView(view));
    }

    fn set_tint(&mut self, tint: Vec4) {
        self.commands.push(RenderCommand::SetTint(tint));
    }

    fn bind_texture(&mut self, texture: TextureHandle) {
        self.commands.push(RenderCommand::BindTexture(texture));
    }

    fn bind_instances(&mut self, buffer: InstanceBufferHandle) {
        self.commands.push(RenderCommand::BindInstances(buffer));
    }

    fn set_block_uniforms(&mut self, uniforms: &BlockUniforms) {
        self.commands.push(RenderCommand::SetBlockUniforms(*uniforms));
    }

    fn draw_quads(&mut self, instances: Range<u32>) {
        self.commands.push(RenderCommand::DrawQuads(instances));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytemuck::Zeroable;

    fn bound_frame(ctx: &mut RecordingContext) -> InstanceBufferHandle {
        let buffer = ctx.create_instance_buffer(&[InstanceRaw::zeroed(); 4]);
        ctx.bind_shader(ShaderHandle(1));
        ctx.set_projection(Mat4::IDENTITY);
        ctx.set_view(Mat4::IDENTITY);
        ctx.bind_texture(TextureHandle(1));
        ctx.bind_instances(buffer);
        buffer
    }

    #[test]
    fn well_ordered_stream_verifies() {
        let mut ctx = RecordingContext::new();
        bound_frame(&mut ctx);
        ctx.set_block_uniforms(&BlockUniforms::zeroed());
        ctx.draw_quads(0..4);
        assert_eq!(ctx.verify(), Ok(()));
        assert_eq!(ctx.draws(), vec![0..4]);
        assert!(ctx.transcript().contains("draw_quads base=0 count=4"));
    }

    #[test]
    fn uniform_before_shader_is_flagged() {
        let mut ctx = RecordingContext::new();
        ctx.set_projection(Mat4::IDENTITY);
        assert_eq!(ctx.verify(), Err(OrderViolation::UniformBeforeShader { index: 0 }));
    }

    #[test]
    fn draw_needs_fresh_block_uniforms() {
        let mut ctx = RecordingContext::new();
        let buffer = bound_frame(&mut ctx);
        ctx.set_block_uniforms(&BlockUniforms::zeroed());
        ctx.bind_instances(buffer);
        ctx.draw_quads(0..1);
        assert_eq!(ctx.verify(), Err(OrderViolation::StaleBlockUniforms { index: 7 }));
    }

    #[test]
    fn draw_without_texture_is_flagged() {
        let mut ctx = RecordingContext::new();
        let buffer = ctx.create_instance_buffer(&[InstanceRaw::zeroed()]);
        ctx.bind_shader(ShaderHandle(1));
        ctx.set_projection(Mat4::IDENTITY);
        ctx.set_view(Mat4::IDENTITY);
        ctx.bind_instances(buffer);
        ctx.set_block_uniforms(&BlockUniforms::zeroed());
        ctx.draw_quads(0..1);
        assert_eq!(ctx.verify(), Err(OrderViolation::NoTexture { index: 5 }));
    }

    #[test]
    fn out_of_bounds_draw_is_flagged() {
        let mut ctx = RecordingContext::new();
        bound_frame(&mut ctx);
        ctx.set_block_uniforms(&BlockUniforms::zeroed());
        ctx.draw_quads(2..5);
        assert!(matches!(ctx.verify(), Err(OrderViolation::OutOfBounds { len: 4, .. })));
    }

    #[test]
    fn destroyed_buffer_is_unknown() {
        let mut ctx = RecordingContext::new();
        let buffer = ctx.create_instance_buffer(&[InstanceRaw::zeroed()]);
        ctx.destroy_instance_buffer(buffer);
        ctx.bind_instances(buffer);
        assert!(matches!(ctx.verify(), Err(OrderViolation::UnknownBuffer { .. })));
        assert_eq!(ctx.live_buffers(), 0);
    }
}
