//! Concrete overlay layers, one per tracked-entity kind.
//!
//! Each layer owns its own pipeline and vertex buffer; nothing is shared
//! across layers, since concurrent frame sizes differ per overlay type.

use crate::config::OverlayConfig;
use crate::error::GraphicsError;
use crate::render::layer::{OverlayLayer, PointOverlay, RenderContext};
use crate::tracking::{EntityKind, FrameSnapshot};

/// Body skeleton joints.
pub struct SkeletonLayer {
    overlay: PointOverlay,
}

impl SkeletonLayer {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat, config: &OverlayConfig) -> Self {
        Self {
            overlay: PointOverlay::new(
                device,
                format,
                "skeleton overlay",
                EntityKind::Body,
                config.skeleton_style,
                config.initial_point_capacity,
            ),
        }
    }
}

impl OverlayLayer for SkeletonLayer {
    fn prepare(
        &mut self,
        ctx: &RenderContext<'_>,
        frame: Option<&FrameSnapshot>,
    ) -> Result<(), GraphicsError> {
        self.overlay.prepare(ctx, frame)
    }

    fn render<'p>(&'p self, pass: &mut wgpu::RenderPass<'p>) {
        self.overlay.render(pass);
    }
}

/// Hand landmark points.
pub struct HandLayer {
    overlay: PointOverlay,
}

impl HandLayer {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat, config: &OverlayConfig) -> Self {
        Self {
            overlay: PointOverlay::new(
                device,
                format,
                "hand overlay",
                EntityKind::Hand,
                config.hand_style,
                config.initial_point_capacity,
            ),
        }
    }
}

impl OverlayLayer for HandLayer {
    fn prepare(
        &mut self,
        ctx: &RenderContext<'_>,
        frame: Option<&FrameSnapshot>,
    ) -> Result<(), GraphicsError> {
        self.overlay.prepare(ctx, frame)
    }

    fn render<'p>(&'p self, pass: &mut wgpu::RenderPass<'p>) {
        self.overlay.render(pass);
    }
}

/// Detected plane boundary vertices.
pub struct PlaneLayer {
    overlay: PointOverlay,
}

impl PlaneLayer {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat, config: &OverlayConfig) -> Self {
        Self {
            overlay: PointOverlay::new(
                device,
                format,
                "plane overlay",
                EntityKind::Plane,
                config.plane_style,
                config.initial_point_capacity,
            ),
        }
    }
}

impl OverlayLayer for PlaneLayer {
    fn prepare(
        &mut self,
        ctx: &RenderContext<'_>,
        frame: Option<&FrameSnapshot>,
    ) -> Result<(), GraphicsError> {
        self.overlay.prepare(ctx, frame)
    }

    fn render<'p>(&'p self, pass: &mut wgpu::RenderPass<'p>) {
        self.overlay.render(pass);
    }
}
