//! The point-overlay pipeline and its uniform contract.
//!
//! One `PointPipeline` per overlay layer: each layer owns its own shader
//! module, uniform storage and bind group, since concurrent frame sizes
//! and styles differ per overlay type.
//!
//! Sized points are drawn as 4-vertex instanced quads (WebGPU has no
//! point-size state); the instance count of every draw call equals the
//! occupied point count of the layer's vertex buffer.

use std::borrow::Cow;
use std::mem;

use bytemuck::{Pod, Zeroable};

use crate::constants::{BYTES_PER_POINT, INITIAL_ENTITY_SLOTS};
use crate::error::GraphicsError;
use crate::render::vertex_buffer::plan_growth;

/// Uniform contract of the point shader. Layout must match
/// [`POINT_SHADER`] exactly.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct PointUniforms {
    /// Camera projection matrix, column-major.
    pub projection: [[f32; 4]; 4],
    /// Overlay color, RGBA.
    pub color: [f32; 4],
    /// Point size in framebuffer pixels.
    pub point_size: f32,
    /// 2.0 for camera-relative 3D positions, 1.0 for screen-relative 2D.
    pub draw_scale: f32,
    /// Viewport extent in pixels, for pixel-to-clip point sizing.
    pub viewport: [f32; 2],
}

static_assertions::const_assert_eq!(mem::size_of::<PointUniforms>(), 96);

pub(crate) const POINT_SHADER: &str = r#"
struct PointUniforms {
    projection: mat4x4<f32>,
    color: vec4<f32>,
    point_size: f32,
    draw_scale: f32,
    viewport: vec2<f32>,
}

@group(0) @binding(0)
var<uniform> overlay: PointUniforms;

@vertex
fn vs_main(
    @builtin(vertex_index) corner_index: u32,
    @location(0) position: vec3<f32>,
) -> @builtin(position) vec4<f32> {
    var corners = array<vec2<f32>, 4>(
        vec2<f32>(-0.5, -0.5),
        vec2<f32>(0.5, -0.5),
        vec2<f32>(-0.5, 0.5),
        vec2<f32>(0.5, 0.5),
    );
    let clip = overlay.projection * vec4<f32>(position * overlay.draw_scale, 1.0);
    let offset = corners[corner_index] * overlay.point_size / overlay.viewport;
    return vec4<f32>(clip.xy + offset * 2.0 * clip.w, clip.zw);
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return overlay.color;
}
"#;

/// Pipeline, uniform storage and bind group for one point overlay.
///
/// Per-entity uniform values live in dynamically-offset slots of one
/// uniform buffer, written before the pass opens; slot storage grows with
/// the same doubling policy as the vertex buffers.
pub struct PointPipeline {
    pipeline: wgpu::RenderPipeline,
    layout: wgpu::BindGroupLayout,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    slot_stride: u64,
    capacity_bytes: u64,
    limit_bytes: u64,
    label: &'static str,
}

impl PointPipeline {
    /// Compile the shader and allocate uniform storage. Render thread
    /// only.
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        label: &'static str,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(POINT_SHADER)),
        });

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(label),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(mem::size_of::<PointUniforms>() as u64),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(label),
            bind_group_layouts: &[&layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: BYTES_PER_POINT,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &[wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x3,
                        offset: 0,
                        shader_location: 0,
                    }],
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        let alignment = device.limits().min_uniform_buffer_offset_alignment as u64;
        let slot_stride = (mem::size_of::<PointUniforms>() as u64).next_multiple_of(alignment);
        let capacity_bytes = INITIAL_ENTITY_SLOTS * slot_stride;
        let uniform_buffer = create_uniform_store(device, label, capacity_bytes);
        let bind_group = create_bind_group(device, &layout, &uniform_buffer, label);

        Self {
            pipeline,
            layout,
            uniform_buffer,
            bind_group,
            slot_stride,
            capacity_bytes,
            limit_bytes: device.limits().max_buffer_size,
            label,
        }
    }

    /// Grow uniform storage to hold one slot per entity drawn this
    /// frame. Slot contents are undefined after growth.
    pub fn ensure_slots(
        &mut self,
        device: &wgpu::Device,
        entities: u64,
    ) -> Result<(), GraphicsError> {
        let required = entities * self.slot_stride;
        if let Some(grown) = plan_growth(self.capacity_bytes, required, self.limit_bytes)? {
            log::debug!(
                "[PointPipeline::ensure_slots] {}: {} -> {} bytes",
                self.label,
                self.capacity_bytes,
                grown
            );
            self.uniform_buffer = create_uniform_store(device, self.label, grown);
            self.bind_group = create_bind_group(device, &self.layout, &self.uniform_buffer, self.label);
            self.capacity_bytes = grown;
        }
        Ok(())
    }

    /// Write one entity's uniform values into its slot.
    pub fn write_slot(&self, queue: &wgpu::Queue, slot: u64, uniforms: &PointUniforms) {
        debug_assert!((slot + 1) * self.slot_stride <= self.capacity_bytes);
        queue.write_buffer(
            &self.uniform_buffer,
            slot * self.slot_stride,
            bytemuck::bytes_of(uniforms),
        );
    }

    /// Bind the pipeline at the start of this layer's draws.
    pub fn begin<'p>(&'p self, pass: &mut wgpu::RenderPass<'p>) {
        pass.set_pipeline(&self.pipeline);
    }

    /// Bind one entity's uniform slot before its draw call.
    pub fn bind_slot<'p>(&'p self, pass: &mut wgpu::RenderPass<'p>, slot: u64) {
        pass.set_bind_group(0, &self.bind_group, &[(slot * self.slot_stride) as u32]);
    }
}

fn create_uniform_store(
    device: &wgpu::Device,
    label: &'static str,
    size: u64,
) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
    label: &'static str,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer,
                offset: 0,
                size: wgpu::BufferSize::new(mem::size_of::<PointUniforms>() as u64),
            }),
        }],
    })
}
