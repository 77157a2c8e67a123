//! Overlay layer interface and the shared point-overlay implementation.

use crate::config::LayerStyle;
use crate::constants::{CAMERA_SPACE_DRAW_SCALE, SCREEN_SPACE_DRAW_SCALE};
use crate::error::GraphicsError;
use crate::render::pipeline::{PointPipeline, PointUniforms};
use crate::render::point_extractor::{extract_valid_points, PointVertex};
use crate::render::vertex_buffer::DynamicVertexBuffer;
use crate::tracking::{CoordinateSystem, EntityKind, FrameSnapshot, TrackingState};

/// Per-tick GPU access handed to layers by the coordinator. Render
/// thread only.
pub struct RenderContext<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    /// Current surface extent in pixels.
    pub viewport: [f32; 2],
}

/// One drawable overlay category, composed by the coordinator in a fixed
/// z-order list.
///
/// Recording a render pass borrows every buffer it draws, so the
/// per-frame work is split in two: `prepare` runs extraction, uploads and
/// uniform writes before the pass opens; `render` issues the draw calls
/// inside it. Both run on the render thread, and so must construction
/// (pipeline and buffer acquisition).
pub trait OverlayLayer {
    /// Process this frame's entities. `None` means the producer had
    /// nothing new; the layer draws nothing this tick.
    fn prepare(
        &mut self,
        ctx: &RenderContext<'_>,
        frame: Option<&FrameSnapshot>,
    ) -> Result<(), GraphicsError>;

    /// Issue draw calls inside the pass.
    fn render<'p>(&'p self, pass: &mut wgpu::RenderPass<'p>);
}

/// One entity's slice of the frame's draw work.
struct DrawBatch {
    instances: std::ops::Range<u32>,
    draw_scale: f32,
}

/// Shared machinery behind the skeleton/hand/plane layers: extract valid
/// points per Tracking entity, upload the frame's combined vertex data in
/// one write, then draw one instanced batch per entity with its own
/// uniform slot.
pub(crate) struct PointOverlay {
    pipeline: PointPipeline,
    vertices: DynamicVertexBuffer,
    /// CPU staging for the frame's concatenated points, reused across
    /// ticks.
    staging: Vec<PointVertex>,
    batches: Vec<DrawBatch>,
    kind: EntityKind,
    style: LayerStyle,
    /// Set after a graphics-resource failure. The layer stops drawing;
    /// the rest of the pipeline continues.
    disabled: bool,
}

impl PointOverlay {
    pub(crate) fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        label: &'static str,
        kind: EntityKind,
        style: LayerStyle,
        initial_points: u64,
    ) -> Self {
        Self {
            pipeline: PointPipeline::new(device, format, label),
            vertices: DynamicVertexBuffer::new(device, label, initial_points),
            staging: Vec::new(),
            batches: Vec::new(),
            kind,
            style,
            disabled: false,
        }
    }

    pub(crate) fn prepare(
        &mut self,
        ctx: &RenderContext<'_>,
        frame: Option<&FrameSnapshot>,
    ) -> Result<(), GraphicsError> {
        self.batches.clear();
        if self.disabled {
            return Ok(());
        }
        let Some(frame) = frame else {
            return Ok(());
        };

        self.staging.clear();
        fill_batches(frame, self.kind, &mut self.staging, &mut self.batches);
        if self.batches.is_empty() {
            return Ok(());
        }

        if let Err(err) = self.upload(ctx, frame) {
            self.disabled = true;
            self.batches.clear();
            return Err(err);
        }
        Ok(())
    }

    fn upload(
        &mut self,
        ctx: &RenderContext<'_>,
        frame: &FrameSnapshot,
    ) -> Result<(), GraphicsError> {
        self.vertices.upload(ctx.device, ctx.queue, &self.staging)?;
        self.pipeline.ensure_slots(ctx.device, self.batches.len() as u64)?;

        let projection = frame.projection.to_cols_array_2d();
        for (slot, batch) in self.batches.iter().enumerate() {
            self.pipeline.write_slot(
                ctx.queue,
                slot as u64,
                &PointUniforms {
                    projection,
                    color: self.style.color,
                    point_size: self.style.point_size_px,
                    draw_scale: batch.draw_scale,
                    viewport: ctx.viewport,
                },
            );
        }
        Ok(())
    }

    pub(crate) fn render<'p>(&'p self, pass: &mut wgpu::RenderPass<'p>) {
        if self.disabled || self.batches.is_empty() {
            return;
        }
        self.pipeline.begin(pass);
        pass.set_vertex_buffer(0, self.vertices.slice());
        for (slot, batch) in self.batches.iter().enumerate() {
            self.pipeline.bind_slot(pass, slot as u64);
            pass.draw(0..4, batch.instances.clone());
        }
    }
}

/// Extract every Tracking entity of `kind` into the staging buffer and
/// record one draw batch per entity. Entities with zero valid landmarks
/// get no batch (skip-draw).
fn fill_batches(
    frame: &FrameSnapshot,
    kind: EntityKind,
    staging: &mut Vec<PointVertex>,
    batches: &mut Vec<DrawBatch>,
) {
    for entity in &frame.entities {
        if entity.kind != kind || entity.tracking_state != TrackingState::Tracking {
            continue;
        }
        let block = extract_valid_points(entity);
        if block.is_empty() {
            // Skip-draw for this entity this frame.
            continue;
        }
        let start = staging.len() as u32;
        staging.extend_from_slice(&block.points);
        batches.push(DrawBatch {
            instances: start..staging.len() as u32,
            draw_scale: draw_scale_for(block.coordinate_system),
        });
    }
}

fn draw_scale_for(coordinate_system: CoordinateSystem) -> f32 {
    match coordinate_system {
        CoordinateSystem::Camera3d => CAMERA_SPACE_DRAW_SCALE,
        CoordinateSystem::Screen2d => SCREEN_SPACE_DRAW_SCALE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::{EntityId, Landmark, TrackedEntity};

    fn body_entity(id: u32, landmarks: Vec<Landmark>) -> TrackedEntity {
        TrackedEntity {
            id: EntityId(id),
            kind: EntityKind::Body,
            tracking_state: TrackingState::Tracking,
            coordinate_system: CoordinateSystem::Camera3d,
            landmarks,
        }
    }

    #[test]
    fn camera_space_points_are_rescaled() {
        assert_eq!(draw_scale_for(CoordinateSystem::Camera3d), 2.0);
        assert_eq!(draw_scale_for(CoordinateSystem::Screen2d), 1.0);
    }

    #[test]
    fn eighteen_slots_twelve_valid_draws_twelve_instances() {
        let mut landmarks = vec![Landmark::present([1.0, 2.0, 3.0]); 12];
        landmarks.extend(vec![Landmark::absent(); 6]);
        let frame = FrameSnapshot {
            projection: glam::Mat4::IDENTITY,
            entities: vec![body_entity(1, landmarks)],
        };

        let mut staging = Vec::new();
        let mut batches = Vec::new();
        fill_batches(&frame, EntityKind::Body, &mut staging, &mut batches);

        assert_eq!(staging.len(), 12);
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].instances, 0..12);
        assert_eq!(batches[0].draw_scale, CAMERA_SPACE_DRAW_SCALE);
    }

    #[test]
    fn other_kinds_and_non_tracking_entities_are_ignored() {
        let mut hand = body_entity(2, vec![Landmark::present([0.0; 3]); 4]);
        hand.kind = EntityKind::Hand;
        let mut paused = body_entity(3, vec![Landmark::present([0.0; 3]); 4]);
        paused.tracking_state = TrackingState::Paused;
        let frame = FrameSnapshot {
            projection: glam::Mat4::IDENTITY,
            entities: vec![hand, paused],
        };

        let mut staging = Vec::new();
        let mut batches = Vec::new();
        fill_batches(&frame, EntityKind::Body, &mut staging, &mut batches);
        assert!(batches.is_empty());
        assert!(staging.is_empty());
    }

    #[test]
    fn entities_without_valid_landmarks_get_no_batch() {
        let frame = FrameSnapshot {
            projection: glam::Mat4::IDENTITY,
            entities: vec![
                body_entity(1, vec![Landmark::absent(); 8]),
                body_entity(2, vec![Landmark::present([4.0, 5.0, 6.0]); 3]),
            ],
        };

        let mut staging = Vec::new();
        let mut batches = Vec::new();
        fill_batches(&frame, EntityKind::Body, &mut staging, &mut batches);

        // Only the second entity draws, with a contiguous range.
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].instances, 0..3);
    }
}
