//! Camera-image background layer.
//!
//! Occupies z-order slot 0 so every overlay blends over the camera
//! preview. The host owns the camera texture (it is fed by the capture
//! pipeline) and hands a view to [`BackdropSource`]; until it does, the
//! layer skips and the clear color shows through.

use std::borrow::Cow;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::GraphicsError;
use crate::render::layer::{OverlayLayer, RenderContext};
use crate::tracking::FrameSnapshot;

const BACKDROP_SHADER: &str = r#"
struct VsOut {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
}

@vertex
fn vs_main(@builtin(vertex_index) index: u32) -> VsOut {
    // Oversized triangle covering the viewport.
    let uv = vec2<f32>(f32((index << 1u) & 2u), f32(index & 2u));
    var out: VsOut;
    out.position = vec4<f32>(uv * 2.0 - 1.0, 0.0, 1.0);
    out.uv = vec2<f32>(uv.x, 1.0 - uv.y);
    return out;
}

@group(0) @binding(0)
var backdrop_texture: texture_2d<f32>;
@group(0) @binding(1)
var backdrop_sampler: sampler;

@fragment
fn fs_main(in: VsOut) -> @location(0) vec4<f32> {
    return textureSample(backdrop_texture, backdrop_sampler, in.uv);
}
"#;

/// Handle through which the host supplies the camera preview texture.
///
/// Setting a new view replaces the previous one on the next tick.
#[derive(Debug, Default)]
pub struct BackdropSource {
    pending: Mutex<Option<wgpu::TextureView>>,
}

impl BackdropSource {
    pub fn set(&self, view: wgpu::TextureView) {
        *self.pending.lock() = Some(view);
    }

    fn take(&self) -> Option<wgpu::TextureView> {
        self.pending.lock().take()
    }
}

/// Fullscreen textured quad drawing the camera image.
pub struct BackdropLayer {
    pipeline: wgpu::RenderPipeline,
    layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    bind_group: Option<wgpu::BindGroup>,
    source: Arc<BackdropSource>,
}

impl BackdropLayer {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        source: Arc<BackdropSource>,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("camera backdrop"),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(BACKDROP_SHADER)),
        });

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("camera backdrop"),
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
            label: Some("camera backdrop"),
            bind_group_layouts: &[&layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("camera backdrop"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("camera backdrop"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self {
            pipeline,
            layout,
            sampler,
            bind_group: None,
            source,
        }
    }
}

impl OverlayLayer for BackdropLayer {
    fn prepare(
        &mut self,
        ctx: &RenderContext<'_>,
        _frame: Option<&FrameSnapshot>,
    ) -> Result<(), GraphicsError> {
        if let Some(view) = self.source.take() {
            self.bind_group = Some(ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("camera backdrop"),
                layout: &self.layout,
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
            }));
        }
        Ok(())
    }

    fn render<'p>(&'p self, pass: &mut wgpu::RenderPass<'p>) {
        let Some(bind_group) = self.bind_group.as_ref() else {
            return;
        };
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, bind_group, &[]);
        pass.draw(0..3, 0..1);
    }
}
