/// WGSL shader for instanced terrain blocks.
///
/// Group 0 is per-frame camera state, group 1 the sprite sheet, group 2 the
/// per-type block uniforms (bound with a dynamic offset per draw).
pub const TERRAIN_SHADER: &str = r#"
const BLOCK_SIZE: f32 = 16.0;
const MAX_ANIMATION_LENGTH: u32 = 8u;

struct FrameUniforms {
    projection: mat4x4<f32>,
    view: mat4x4<f32>,
    tint: vec4<f32>,
};

struct BlockUniforms {
    uv_scale: vec2<f32>,
    frame_count: u32,
    current_frame: u32,
    uv_offsets: array<vec4<f32>, MAX_ANIMATION_LENGTH>,
};

@group(0) @binding(0)
var<uniform> frame: FrameUniforms;

@group(1) @binding(0)
var sheet: texture_2d<f32>;
@group(1) @binding(1)
var sheet_sampler: sampler;

@group(2) @binding(0)
var<uniform> block: BlockUniforms;

struct VertexInput {
    @location(0) position: vec2<f32>,
    @location(1) uv: vec2<f32>,
};

struct InstanceInput {
    @location(2) position: vec2<f32>,
    @location(3) phase: u32,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let world = instance.position + vertex.position * BLOCK_SIZE;
    let frame_index = (instance.phase + block.current_frame) % max(block.frame_count, 1u);
    let offset = block.uv_offsets[frame_index].xy;

    var out: VertexOutput;
    out.clip_position = frame.projection * frame.view * vec4<f32>(world, 0.0, 1.0);
    out.uv = (vertex.uv + offset) / block.uv_scale;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let color = textureSample(sheet, sheet_sampler, in.uv) * frame.tint;
    if (color.a < 0.01) {
        discard;
    }
    return color;
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use blockscape_common::{BLOCK_SIZE, MAX_ANIMATION_LENGTH};

    #[test]
    fn shader_constants_match_crate_constants() {
        assert!(TERRAIN_SHADER.contains(&format!("const BLOCK_SIZE: f32 = {BLOCK_SIZE:.1};")));
        assert!(TERRAIN_SHADER.contains(&format!(
            "const MAX_ANIMATION_LENGTH: u32 = {MAX_ANIMATION_LENGTH}u;"
        )));
    }

    #[test]
    fn shader_declares_entry_points() {
        assert!(TERRAIN_SHADER.contains("fn vs_main"));
        assert!(TERRAIN_SHADER.contains("fn fs_main"));
    }
}
