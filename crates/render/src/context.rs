use blockscape_blocks::RenderMetadata;
use blockscape_common::{
    GpuResources, InstanceBufferHandle, MAX_ANIMATION_LENGTH, ShaderHandle, TextureHandle,
};
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};
use std::ops::Range;

/// Uniforms uploaded once per drawn block type.
///
/// Matches `BlockUniforms` in the terrain shader: offsets are padded to
/// `vec4` because uniform arrays have a 16-byte stride.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct BlockUniforms {
    pub uv_scale: [f32; 2],
    pub frame_count: u32,
    pub current_frame: u32,
    pub uv_offsets: [[f32; 4]; MAX_ANIMATION_LENGTH],
}

impl BlockUniforms {
    pub fn new(meta: &RenderMetadata, current_frame: u32) -> Self {
        let mut uv_offsets = [[0.0; 4]; MAX_ANIMATION_LENGTH];
        for (slot, offset) in uv_offsets.iter_mut().zip(meta.uv_offsets.iter()) {
            slot[0] = offset.x;
            slot[1] = offset.y;
        }
        Self {
            uv_scale: meta.uv_scale().to_array(),
            frame_count: meta.frame_count,
            current_frame,
            uv_offsets,
        }
    }
}

/// Explicit GPU binding state.
///
/// A single owner threads this through every render call, so the ordering
/// contract is visible in code: uniforms after `bind_shader`, the texture
/// before any draw that samples it, block uniforms after `bind_instances`
/// and before the `draw_quads` they apply to. Submission is fire-and-forget.
pub trait RenderContext: GpuResources {
    fn bind_shader(&mut self, shader: ShaderHandle);
    fn set_projection(&mut self, projection: Mat4);
    fn set_view(&mut self, view: Mat4);
    fn set_tint(&mut self, tint: Vec4);
    fn bind_texture(&mut self, texture: TextureHandle);
    /// Bind a chunk's instance buffer as the per-instance vertex stream.
    fn bind_instances(&mut self, buffer: InstanceBufferHandle);
    fn set_block_uniforms(&mut self, uniforms: &BlockUniforms);
    /// Instanced draw of the shared unit quad. `instances.start` is the base instance.
    fn draw_quads(&mut self, instances: Range<u32>);
}

/// One recorded `RenderContext` call.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    BindShader(ShaderHandle),
    SetProjection(Mat4),
    SetView(Mat4),
    SetTint(Vec4),
    BindTexture(TextureHandle),
    BindInstances(InstanceBufferHandle),
    SetBlockUniforms(BlockUniforms),
    DrawQuads(Range<u32>),
}

impl RenderCommand {
    /// Replay the command against a context.
    pub fn apply(&self, ctx: &mut impl RenderContext) {
        match self {
            RenderCommand::BindShader(shader) => ctx.bind_shader(*shader),
            RenderCommand::SetProjection(m) => ctx.set_projection(*m),
            RenderCommand::SetView(m) => ctx.set_view(*m),
            RenderCommand::SetTint(tint) => ctx.set_tint(*tint),
            RenderCommand::BindTexture(texture) => ctx.bind_texture(*texture),
            RenderCommand::BindInstances(buffer) => ctx.bind_instances(*buffer),
            RenderCommand::SetBlockUniforms(u) => ctx.set_block_uniforms(u),
            RenderCommand::DrawQuads(range) => ctx.draw_quads(range.clone()),
        }
    }

    pub fn is_draw(&self) -> bool {
        matches!(self, RenderCommand::DrawQuads(_))
    }
}
