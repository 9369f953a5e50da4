use crate::plan::{FrameUniforms, PassPlan, PassStep, align_to, pack_strided};
use crate::shaders;
use blockscape_common::{
    GpuResources, InstanceBufferHandle, InstanceRaw, ShaderHandle, TextureHandle,
};
use blockscape_render::{BlockUniforms, QUAD_INDEX_COUNT, RenderCommand, RenderContext};
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};
use std::collections::HashMap;
use std::ops::Range;
use wgpu::util::DeviceExt;

/// Errors from the wgpu backend.
#[derive(Debug, thiserror::Error)]
pub enum GpuError {
    #[error("no compatible GPU adapter found")]
    NoAdapter,
    #[error("failed to create device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("texture data is {actual} bytes, expected {expected} for {width}x{height} RGBA")]
    TextureSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("readback failed: {0}")]
    Readback(String),
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct QuadVertex {
    position: [f32; 2],
    uv: [f32; 2],
}

/// Unit quad centered on the origin. Texture v grows downwards, world y upwards.
#[rustfmt::skip]
const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { position: [-0.5, -0.5], uv: [0.0, 1.0] },
    QuadVertex { position: [ 0.5, -0.5], uv: [1.0, 1.0] },
    QuadVertex { position: [-0.5,  0.5], uv: [0.0, 0.0] },
    QuadVertex { position: [ 0.5,  0.5], uv: [1.0, 0.0] },
];
const QUAD_INDICES: [u16; QUAD_INDEX_COUNT as usize] = [0, 1, 2, 2, 1, 3];

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.392157,
    g: 0.584314,
    b: 0.929412,
    a: 1.0,
};

struct InstanceBuffer {
    buffer: wgpu::Buffer,
    capacity: usize,
    len: usize,
}

/// Dynamic-offset uniform table that grows on demand.
struct UniformTable {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    capacity: usize,
    record_size: u64,
    label: &'static str,
}

impl UniformTable {
    fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        label: &'static str,
        record_size: u64,
        stride: u64,
        capacity: usize,
    ) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: stride * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(record_size),
                }),
            }],
        });
        Self {
            buffer,
            bind_group,
            capacity,
            record_size,
            label,
        }
    }

    fn upload<T: Pod>(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        stride: u64,
        items: &[T],
    ) {
        if items.len() > self.capacity {
            let capacity = items.len().next_power_of_two();
            tracing::debug!(table = self.label, capacity, "growing uniform table");
            *self = Self::new(device, layout, self.label, self.record_size, stride, capacity);
        }
        if !items.is_empty() {
            queue.write_buffer(&self.buffer, 0, &pack_strided(items, stride));
        }
    }
}

fn uniform_layout(
    device: &wgpu::Device,
    label: &str,
    visibility: wgpu::ShaderStages,
    size: u64,
) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: true,
                min_binding_size: wgpu::BufferSize::new(size),
            },
            count: None,
        }],
    })
}

/// Offscreen color target for headless rendering.
pub struct RenderTarget {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    width: u32,
    height: u32,
}

impl RenderTarget {
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Counts from one submitted pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmitStats {
    pub draws: usize,
    pub skipped: usize,
}

/// wgpu implementation of `RenderContext`.
///
/// Calls are recorded and replayed into a single render pass by `submit`.
pub struct WgpuContext {
    device: wgpu::Device,
    queue: wgpu::Queue,
    format: wgpu::TextureFormat,
    pipeline_layout: wgpu::PipelineLayout,
    frame_layout: wgpu::BindGroupLayout,
    texture_layout: wgpu::BindGroupLayout,
    block_layout: wgpu::BindGroupLayout,
    uniform_stride: u64,
    frame_table: UniformTable,
    block_table: UniformTable,
    sampler: wgpu::Sampler,
    quad_vertices: wgpu::Buffer,
    quad_indices: wgpu::Buffer,
    pipelines: HashMap<ShaderHandle, wgpu::RenderPipeline>,
    textures: HashMap<TextureHandle, wgpu::BindGroup>,
    instances: HashMap<InstanceBufferHandle, InstanceBuffer>,
    next_handle: u32,
    commands: Vec<RenderCommand>,
}

impl WgpuContext {
    pub fn new(device: wgpu::Device, queue: wgpu::Queue, format: wgpu::TextureFormat) -> Self {
        let frame_size = std::mem::size_of::<FrameUniforms>() as u64;
        let block_size = std::mem::size_of::<BlockUniforms>() as u64;
        let alignment = device.limits().min_uniform_buffer_offset_alignment as u64;
        let uniform_stride = align_to(frame_size.max(block_size), alignment);

        let frame_layout = uniform_layout(
            &device,
            "frame_uniforms_layout",
            wgpu::ShaderStages::VERTEX_FRAGMENT,
            frame_size,
        );
        let block_layout = uniform_layout(
            &device,
            "block_uniforms_layout",
            wgpu::ShaderStages::VERTEX,
            block_size,
        );
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sheet_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("terrain_pipeline_layout"),
            bind_group_layouts: &[&frame_layout, &texture_layout, &block_layout],
            push_constant_ranges: &[],
        });

        let frame_table = UniformTable::new(
            &device,
            &frame_layout,
            "frame_uniforms",
            frame_size,
            uniform_stride,
            4,
        );
        let block_table = UniformTable::new(
            &device,
            &block_layout,
            "block_uniforms",
            block_size,
            uniform_stride,
            64,
        );

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("sheet_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let quad_vertices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_vertex_buffer"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let quad_indices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_index_buffer"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            device,
            queue,
            format,
            pipeline_layout,
            frame_layout,
            texture_layout,
            block_layout,
            uniform_stride,
            frame_table,
            block_table,
            sampler,
            quad_vertices,
            quad_indices,
            pipelines: HashMap::new(),
            textures: HashMap::new(),
            instances: HashMap::new(),
            next_handle: 0,
            commands: Vec::new(),
        }
    }

    /// Create a device with no surface. Targets are `Rgba8UnormSrgb`.
    pub fn headless() -> Result<Self, GpuError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: None,
            force_fallback_adapter: false,
        }))
        .ok_or(GpuError::NoAdapter)?;
        tracing::info!(adapter = ?adapter.get_info().name, "headless adapter selected");

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("blockscape_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                memory_hints: Default::default(),
            },
            None,
        ))?;

        Ok(Self::new(device, queue, wgpu::TextureFormat::Rgba8UnormSrgb))
    }

    fn next_handle(&mut self) -> u32 {
        self.next_handle += 1;
        self.next_handle
    }

    /// Compile a terrain-style shader against the fixed bind group and vertex layout.
    pub fn register_shader(&mut self, label: &str, wgsl: &str) -> ShaderHandle {
        let module = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(wgsl.into()),
        });

        let pipeline = self.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(&self.pipeline_layout),
            vertex: wgpu::VertexState {
                module: &module,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<QuadVertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![
                            0 => Float32x2,
                            1 => Float32x2,
                        ],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<InstanceRaw>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &wgpu::vertex_attr_array![
                            2 => Float32x2,
                            3 => Uint32,
                        ],
                    },
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &module,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let handle = ShaderHandle(self.next_handle());
        self.pipelines.insert(handle, pipeline);
        tracing::debug!(label, ?handle, "shader registered");
        handle
    }

    /// Compile the built-in terrain shader.
    pub fn register_terrain_shader(&mut self) -> ShaderHandle {
        self.register_shader("terrain_shader", shaders::TERRAIN_SHADER)
    }

    /// Upload an RGBA8 sprite sheet.
    pub fn register_texture(
        &mut self,
        label: &str,
        rgba: &[u8],
        width: u32,
        height: u32,
    ) -> Result<TextureHandle, GpuError> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected || width == 0 || height == 0 {
            return Err(GpuError::TextureSize {
                width,
                height,
                expected,
                actual: rgba.len(),
            });
        }

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&Default::default());
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &self.texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        let handle = TextureHandle(self.next_handle());
        self.textures.insert(handle, bind_group);
        tracing::debug!(label, width, height, ?handle, "texture registered");
        Ok(handle)
    }

    pub fn create_target(&self, width: u32, height: u32) -> RenderTarget {
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("offscreen_target"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: self.format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&Default::default());
        RenderTarget {
            texture,
            view,
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Replay the recorded commands into one render pass on `target` and submit it.
    pub fn submit(&mut self, target: &wgpu::TextureView) -> SubmitStats {
        let commands = std::mem::take(&mut self.commands);
        let plan = PassPlan::build(&commands);

        self.frame_table.upload(
            &self.device,
            &self.queue,
            &self.frame_layout,
            self.uniform_stride,
            &plan.frames,
        );
        self.block_table.upload(
            &self.device,
            &self.queue,
            &self.block_layout,
            self.uniform_stride,
            &plan.blocks,
        );

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("terrain_encoder"),
        });
        let mut stats = SubmitStats {
            draws: 0,
            skipped: plan.skipped,
        };

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("terrain_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                ..Default::default()
            });
            pass.set_vertex_buffer(0, self.quad_vertices.slice(..));
            pass.set_index_buffer(self.quad_indices.slice(..), wgpu::IndexFormat::Uint16);

            let mut pipeline = false;
            let mut texture = false;
            let mut bound: Option<&InstanceBuffer> = None;

            for step in &plan.steps {
                match step {
                    PassStep::Pipeline(handle) => match self.pipelines.get(handle) {
                        Some(p) => {
                            pass.set_pipeline(p);
                            pipeline = true;
                        }
                        None => {
                            tracing::warn!(?handle, "unknown shader");
                            pipeline = false;
                        }
                    },
                    PassStep::Texture(handle) => match self.textures.get(handle) {
                        Some(bind_group) => {
                            pass.set_bind_group(1, bind_group, &[]);
                            texture = true;
                        }
                        None => {
                            tracing::warn!(?handle, "unknown texture");
                            texture = false;
                        }
                    },
                    PassStep::Instances(handle) => {
                        bound = self.instances.get(handle);
                        match bound {
                            Some(buffer) => pass.set_vertex_buffer(1, buffer.buffer.slice(..)),
                            None => tracing::warn!(?handle, "unknown instance buffer"),
                        }
                    }
                    PassStep::Draw {
                        frame,
                        block,
                        instances,
                    } => {
                        let Some(buffer) = bound else {
                            stats.skipped += 1;
                            continue;
                        };
                        if !pipeline || !texture || !in_bounds(instances, buffer.len) {
                            tracing::warn!(?instances, len = buffer.len, "draw skipped");
                            stats.skipped += 1;
                            continue;
                        }
                        let frame_offset = (*frame as u64 * self.uniform_stride) as u32;
                        let block_offset = (*block as u64 * self.uniform_stride) as u32;
                        pass.set_bind_group(0, &self.frame_table.bind_group, &[frame_offset]);
                        pass.set_bind_group(2, &self.block_table.bind_group, &[block_offset]);
                        pass.draw_indexed(0..QUAD_INDEX_COUNT, 0, instances.clone());
                        stats.draws += 1;
                    }
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        tracing::trace!(draws = stats.draws, skipped = stats.skipped, "pass submitted");
        stats
    }

    /// Copy a target back to tightly packed RGBA8 rows.
    pub fn read_target(&self, target: &RenderTarget) -> Result<Vec<u8>, GpuError> {
        let unpadded = 4 * target.width;
        let padded = align_to(unpadded as u64, wgpu::COPY_BYTES_PER_ROW_ALIGNMENT as u64) as u32;
        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("readback_buffer"),
            size: padded as u64 * target.height as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("readback_encoder"),
        });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &target.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded),
                    rows_per_image: Some(target.height),
                },
            },
            wgpu::Extent3d {
                width: target.width,
                height: target.height,
                depth_or_array_layers: 1,
            },
        );
        self.queue.submit(std::iter::once(encoder.finish()));

        let slice = buffer.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        let _ = self.device.poll(wgpu::Maintain::Wait);
        rx.recv()
            .map_err(|e| GpuError::Readback(e.to_string()))?
            .map_err(|e| GpuError::Readback(e.to_string()))?;

        let mut pixels = Vec::with_capacity((unpadded * target.height) as usize);
        {
            let data = slice.get_mapped_range();
            for row in data.chunks(padded as usize) {
                pixels.extend_from_slice(&row[..unpadded as usize]);
            }
        }
        buffer.unmap();
        Ok(pixels)
    }

    /// Number of live instance buffers.
    pub fn instance_buffer_count(&self) -> usize {
        self.instances.len()
    }
}

fn in_bounds(range: &Range<u32>, len: usize) -> bool {
    range.start <= range.end && range.end as usize <= len
}

impl GpuResources for WgpuContext {
    fn create_instance_buffer(&mut self, data: &[InstanceRaw]) -> InstanceBufferHandle {
        let capacity = data.len().max(1);
        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("chunk_instances"),
            size: (capacity * std::mem::size_of::<InstanceRaw>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        if !data.is_empty() {
            self.queue.write_buffer(&buffer, 0, bytemuck::cast_slice(data));
        }
        let handle = InstanceBufferHandle(self.next_handle());
        self.instances.insert(
            handle,
            InstanceBuffer {
                buffer,
                capacity,
                len: data.len(),
            },
        );
        handle
    }

    fn write_instance_buffer(&mut self, handle: InstanceBufferHandle, data: &[InstanceRaw]) {
        let grow = match self.instances.get_mut(&handle) {
            Some(existing) if data.len() <= existing.capacity => {
                if !data.is_empty() {
                    self.queue.write_buffer(&existing.buffer, 0, bytemuck::cast_slice(data));
                }
                existing.len = data.len();
                false
            }
            Some(_) => true,
            None => {
                tracing::warn!(?handle, "write to unknown instance buffer");
                false
            }
        };
        if grow {
            let capacity = data.len().next_power_of_two();
            let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("chunk_instances"),
                size: (capacity * std::mem::size_of::<InstanceRaw>()) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            self.queue.write_buffer(&buffer, 0, bytemuck::cast_slice(data));
            if let Some(old) = self.instances.insert(
                handle,
                InstanceBuffer {
                    buffer,
                    capacity,
                    len: data.len(),
                },
            ) {
                old.buffer.destroy();
            }
        }
    }

    fn destroy_instance_buffer(&mut self, handle: InstanceBufferHandle) {
        if let Some(old) = self.instances.remove(&handle) {
            old.buffer.destroy();
        }
    }
}

impl RenderContext for WgpuContext {
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
