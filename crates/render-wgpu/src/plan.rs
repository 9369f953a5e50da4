use blockscape_common::{InstanceBufferHandle, ShaderHandle, TextureHandle};
use blockscape_render::{BlockUniforms, RenderCommand};
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};
use std::ops::Range;

/// Camera state as laid out in the terrain shader's group 0.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct FrameUniforms {
    pub projection: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub tint: [f32; 4],
}

impl Default for FrameUniforms {
    fn default() -> Self {
        Self {
            projection: Mat4::IDENTITY.to_cols_array_2d(),
            view: Mat4::IDENTITY.to_cols_array_2d(),
            tint: Vec4::ONE.to_array(),
        }
    }
}

/// One pass-level operation after uniform values have been hoisted out.
#[derive(Debug, Clone, PartialEq)]
pub enum PassStep {
    Pipeline(ShaderHandle),
    Texture(TextureHandle),
    Instances(InstanceBufferHandle),
    /// Indices into `PassPlan::frames` and `PassPlan::blocks`.
    Draw {
        frame: usize,
        block: usize,
        instances: Range<u32>,
    },
}

/// A recorded command stream split into uniform tables plus pass steps.
///
/// Uniform writes inside a render pass are not ordered with draws, so every
/// distinct uniform value gets its own slot and draws select one by dynamic offset.
#[derive(Debug, Default, PartialEq)]
pub struct PassPlan {
    pub frames: Vec<FrameUniforms>,
    pub blocks: Vec<BlockUniforms>,
    pub steps: Vec<PassStep>,
    /// Draws dropped because no block uniforms had been set.
    pub skipped: usize,
}

impl PassPlan {
    pub fn build(commands: &[RenderCommand]) -> Self {
        let mut plan = PassPlan::default();
        let mut frame = FrameUniforms::default();
        let mut frame_dirty = true;
        let mut block: Option<usize> = None;

        for command in commands {
            match command {
                RenderCommand::BindShader(shader) => plan.steps.push(PassStep::Pipeline(*shader)),
                RenderCommand::SetProjection(m) => {
                    frame.projection = m.to_cols_array_2d();
                    frame_dirty = true;
                }
                RenderCommand::SetView(m) => {
                    frame.view = m.to_cols_array_2d();
                    frame_dirty = true;
                }
                RenderCommand::SetTint(tint) => {
                    frame.tint = tint.to_array();
                    frame_dirty = true;
                }
                RenderCommand::BindTexture(texture) => plan.steps.push(PassStep::Texture(*texture)),
                RenderCommand::BindInstances(buffer) => {
                    plan.steps.push(PassStep::Instances(*buffer));
                }
                RenderCommand::SetBlockUniforms(uniforms) => {
                    if plan.blocks.last() != Some(uniforms) || block.is_none() {
                        plan.blocks.push(*uniforms);
                    }
                    block = Some(plan.blocks.len() - 1);
                }
                RenderCommand::DrawQuads(range) => {
                    let Some(block) = block else {
                        plan.skipped += 1;
                        continue;
                    };
                    if frame_dirty {
                        plan.frames.push(frame);
                        frame_dirty = false;
                    }
                    plan.steps.push(PassStep::Draw {
                        frame: plan.frames.len() - 1,
                        block,
                        instances: range.clone(),
                    });
                }
            }
        }
        plan
    }

    pub fn draw_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s, PassStep::Draw { .. }))
            .count()
    }
}

/// Round `size` up to a multiple of `alignment` (a power of two).
pub fn align_to(size: u64, alignment: u64) -> u64 {
    (size + alignment - 1) & !(alignment - 1)
}

/// Pack uniform records at a fixed stride for dynamic-offset binding.
pub fn pack_strided<T: Pod>(items: &[T], stride: u64) -> Vec<u8> {
    let stride = stride as usize;
    let mut bytes = vec![0u8; items.len().max(1) * stride];
    for (i, item) in items.iter().enumerate() {
        let src = bytemuck::bytes_of(item);
        bytes[i * stride..i * stride + src.len()].copy_from_slice(src);
    }
    bytes
}
