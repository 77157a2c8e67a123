//! Host-facing facade.
//!
//! The surrounding application owns the window, the surface, the GPU
//! device and the tracking engine; this type owns the lifecycle machine,
//! the cross-thread queues and the overlay layers, and exposes exactly
//! the entry points the host's lifecycle and render callbacks need.

use std::sync::Arc;

use crate::config::OverlayConfig;
use crate::error::{ConfigError, SessionError};
use crate::input::{GestureEvent, GestureSender};
use crate::render::backdrop::{BackdropLayer, BackdropSource};
use crate::render::coordinator::{FrameCoordinator, InteractionHandler};
use crate::render::layer::{OverlayLayer, RenderContext};
use crate::render::layers::{HandLayer, PlaneLayer, SkeletonLayer};
use crate::session::{
    NoticeSender, SessionFactory, SessionLifecycle, SessionState, StartOutcome, StatusSink,
};

struct GpuHandles {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
}

/// The render-loop core behind the host's activity and surface callbacks.
pub struct OverlayEngine {
    config: OverlayConfig,
    lifecycle: SessionLifecycle,
    coordinator: FrameCoordinator,
    backdrop: Arc<BackdropSource>,
    gpu: Option<GpuHandles>,
    viewport: (u32, u32),
}

impl OverlayEngine {
    pub fn new(
        factory: Box<dyn SessionFactory>,
        config: OverlayConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let coordinator = FrameCoordinator::new(config.gesture_queue_capacity);
        Ok(Self {
            lifecycle: SessionLifecycle::new(factory),
            coordinator,
            backdrop: Arc::new(BackdropSource::default()),
            gpu: None,
            viewport: (1, 1),
            config,
        })
    }

    // --- host lifecycle -------------------------------------------------

    /// Check capability, configure and resume a new tracking session.
    pub fn start(&mut self) -> StartOutcome {
        self.lifecycle.start()
    }

    /// Re-acquire the camera after `pause()`.
    pub fn resume(&mut self) -> Result<(), SessionError> {
        self.lifecycle.resume()
    }

    /// Release the camera and stop frame production. Safe to call from
    /// the host's pause callback at any point; the render loop observes
    /// it at the top of its next tick.
    pub fn pause(&mut self) {
        self.lifecycle.pause()
    }

    /// Tear the session down. Idempotent.
    pub fn stop(&mut self) {
        self.lifecycle.stop()
    }

    /// One-time GPU setup once the host's surface exists. Builds every
    /// overlay layer in its fixed z-order. Render thread only.
    pub fn on_surface_created(
        &mut self,
        device: Arc<wgpu::Device>,
        queue: Arc<wgpu::Queue>,
        format: wgpu::TextureFormat,
    ) {
        let layers: Vec<Box<dyn OverlayLayer>> = vec![
            Box::new(BackdropLayer::new(&device, format, Arc::clone(&self.backdrop))),
            Box::new(PlaneLayer::new(&device, format, &self.config)),
            Box::new(SkeletonLayer::new(&device, format, &self.config)),
            Box::new(HandLayer::new(&device, format, &self.config)),
        ];
        self.coordinator.set_layers(layers);
        self.gpu = Some(GpuHandles { device, queue });
        log::info!("[OverlayEngine::on_surface_created] overlay layers initialized");
    }

    /// Record the new surface extent and forward it to the session.
    pub fn on_surface_changed(&mut self, width: u32, height: u32) {
        self.viewport = (width.max(1), height.max(1));
        self.lifecycle.set_display_size(width, height);
    }

    /// One render tick, driven by the host's continuous render callback.
    /// Skipped entirely unless the session is resumed: no draw calls, no
    /// buffer touches, no queue drains.
    pub fn on_frame_tick(&mut self, target: &wgpu::TextureView) {
        if self.lifecycle.state() != &SessionState::Resumed {
            return;
        }
        let Some(gpu) = self.gpu.as_ref() else {
            log::warn!("[OverlayEngine::on_frame_tick] tick before surface creation");
            return;
        };

        let frame = self.lifecycle.latest_frame();
        let ctx = RenderContext {
            device: &gpu.device,
            queue: &gpu.queue,
            viewport: [self.viewport.0 as f32, self.viewport.1 as f32],
        };
        self.coordinator.prepare(&ctx, frame.as_ref());

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("overlay frame"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("overlay pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.config.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.coordinator.render(&mut pass);
        }
        gpu.queue.submit(Some(encoder.finish()));
    }

    // --- collaborators --------------------------------------------------

    /// Producer handle for the UI thread's gesture detector.
    pub fn gesture_sender(&self) -> GestureSender {
        self.coordinator.gesture_sender()
    }

    /// Forward one gesture into the queue. Returns `false` when the
    /// queue rejected it.
    pub fn submit_gesture(&self, event: GestureEvent) -> bool {
        self.coordinator.gesture_sender().offer(event)
    }

    /// Producer handle for the tracking service's listener threads.
    pub fn notice_sender(&self) -> NoticeSender {
        self.coordinator.notice_sender()
    }

    pub fn set_interaction_handler(&mut self, handler: Box<dyn InteractionHandler>) {
        self.coordinator.set_interaction_handler(handler);
    }

    pub fn set_status_sink(&mut self, sink: Box<dyn StatusSink>) {
        self.coordinator.set_status_sink(sink);
    }

    /// Handle through which the host supplies the camera preview
    /// texture.
    pub fn backdrop_source(&self) -> Arc<BackdropSource> {
        Arc::clone(&self.backdrop)
    }

    /// Lifecycle state, for the host's own gating and diagnostics.
    pub fn session_state(&self) -> &SessionState {
        self.lifecycle.state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{RuntimeProbe, TrackingSession};
    use crate::tracking::FrameSnapshot;

    struct IdleSession;

    impl TrackingSession for IdleSession {
        fn resume(&mut self) -> Result<(), SessionError> {
            Ok(())
        }
        fn pause(&mut self) {}
        fn stop(&mut self) {}
        fn latest_frame(&mut self) -> Option<FrameSnapshot> {
            None
        }
    }

    struct ReadyFactory;

    impl RuntimeProbe for ReadyFactory {
        fn is_available(&self) -> bool {
            true
        }
        fn request_install(&mut self) {}
    }

    impl SessionFactory for ReadyFactory {
        fn create_session(&mut self) -> Result<Box<dyn TrackingSession>, SessionError> {
            Ok(Box::new(IdleSession))
        }
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let mut config = OverlayConfig::default();
        config.gesture_queue_capacity = 0;
        assert!(OverlayEngine::new(Box::new(ReadyFactory), config).is_err());
    }

    #[test]
    fn lifecycle_calls_pass_through() {
        let mut engine =
            OverlayEngine::new(Box::new(ReadyFactory), OverlayConfig::default()).unwrap();
        assert_eq!(engine.session_state(), &SessionState::Uninitialized);

        assert_eq!(engine.start(), StartOutcome::Running);
        assert_eq!(engine.session_state(), &SessionState::Resumed);

        engine.pause();
        assert_eq!(engine.session_state(), &SessionState::Paused);
        assert!(engine.resume().is_ok());

        engine.stop();
        assert_eq!(engine.session_state(), &SessionState::Stopped);
    }

    #[test]
    fn gesture_submission_respects_the_bound() {
        let engine =
            OverlayEngine::new(Box::new(ReadyFactory), OverlayConfig::default()).unwrap();
        let tap = GestureEvent::SingleTapUp { x: 1.0, y: 1.0 };
        assert!(engine.submit_gesture(tap));
        assert!(engine.submit_gesture(tap));
        assert!(!engine.submit_gesture(tap));
    }
}
