//! Per-frame orchestration.
//!
//! The coordinator owns the overlay layers in their fixed z-order and the
//! cross-thread queues feeding the render loop. The session gate (skip
//! the whole tick unless the session is resumed) sits above it in the
//! engine facade, checked once at the top of each tick.

use crate::input::{GestureEvent, GestureQueue, GestureSender};
use crate::render::layer::{OverlayLayer, RenderContext};
use crate::session::{NoticeChannel, NoticeSender, StatusSink};
use crate::tracking::FrameSnapshot;

/// External collaborator performing hit-testing and object placement for
/// gestures, against the frame they will be applied to.
pub trait InteractionHandler {
    fn on_gesture(&mut self, event: &GestureEvent, frame: Option<&FrameSnapshot>);
}

/// Drains the queues and fans the frame out to the overlay layers, once
/// per render tick.
pub struct FrameCoordinator {
    /// Fixed draw order: backdrop, then world overlays, then
    /// skeleton/hand overlays; later layers blend over earlier ones.
    layers: Vec<Box<dyn OverlayLayer>>,
    gestures: GestureQueue,
    notices: NoticeChannel,
    interaction: Option<Box<dyn InteractionHandler>>,
    status: Option<Box<dyn StatusSink>>,
}

impl FrameCoordinator {
    pub fn new(gesture_capacity: usize) -> Self {
        Self {
            layers: Vec::new(),
            gestures: GestureQueue::new(gesture_capacity),
            notices: NoticeChannel::new(),
            interaction: None,
            status: None,
        }
    }

    /// Install the overlay layers, replacing any previous set. Called
    /// when the surface is (re)created, render thread only.
    pub fn set_layers(&mut self, layers: Vec<Box<dyn OverlayLayer>>) {
        self.layers = layers;
    }

    pub fn gesture_sender(&self) -> GestureSender {
        self.gestures.sender()
    }

    pub fn notice_sender(&self) -> NoticeSender {
        self.notices.sender()
    }

    pub fn set_interaction_handler(&mut self, handler: Box<dyn InteractionHandler>) {
        self.interaction = Some(handler);
    }

    pub fn set_status_sink(&mut self, sink: Box<dyn StatusSink>) {
        self.status = Some(sink);
    }

    /// First half of a tick: drain the queues, then run every layer's
    /// uploads. The caller has already checked the session gate.
    pub fn prepare(&mut self, ctx: &RenderContext<'_>, frame: Option<&FrameSnapshot>) {
        self.dispatch_input(frame);
        for layer in &mut self.layers {
            if let Err(err) = layer.prepare(ctx, frame) {
                // Scoped to the failing layer; the others keep drawing.
                log::error!("[FrameCoordinator::prepare] overlay layer disabled: {}", err);
            }
        }
    }

    /// Deliver queued gestures and service notices to their handlers.
    /// Events are consumed exactly once, in the order they were produced;
    /// events drained with no handler installed are dropped. Render
    /// thread only.
    fn dispatch_input(&mut self, frame: Option<&FrameSnapshot>) {
        for event in self.gestures.drain() {
            match self.interaction.as_mut() {
                Some(handler) => handler.on_gesture(&event, frame),
                None => log::debug!(
                    "[FrameCoordinator::dispatch_input] no interaction handler, dropped {:?}",
                    event
                ),
            }
        }
        for notice in self.notices.drain() {
            if let Some(sink) = self.status.as_mut() {
                sink.on_notice(&notice);
            }
        }
    }

    /// Second half of a tick: draw every layer in z-order.
    pub fn render<'p>(&'p self, pass: &mut wgpu::RenderPass<'p>) {
        for layer in &self.layers {
            layer.render(pass);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::GESTURE_QUEUE_CAPACITY;
    use crate::session::ServiceNotice;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct RecordingHandler {
        seen: Rc<RefCell<Vec<(GestureEvent, bool)>>>,
    }

    impl InteractionHandler for RecordingHandler {
        fn on_gesture(&mut self, event: &GestureEvent, frame: Option<&FrameSnapshot>) {
            self.seen.borrow_mut().push((*event, frame.is_some()));
        }
    }

    struct RecordingSink {
        seen: Rc<RefCell<Vec<ServiceNotice>>>,
    }

    impl StatusSink for RecordingSink {
        fn on_notice(&mut self, notice: &ServiceNotice) {
            self.seen.borrow_mut().push(notice.clone());
        }
    }

    #[test]
    fn gestures_reach_the_handler_in_order_with_the_frame() {
        let mut coordinator = FrameCoordinator::new(GESTURE_QUEUE_CAPACITY);
        let seen = Rc::new(RefCell::new(Vec::new()));
        coordinator.set_interaction_handler(Box::new(RecordingHandler {
            seen: Rc::clone(&seen),
        }));

        let sender = coordinator.gesture_sender();
        assert!(sender.offer(GestureEvent::Down { x: 5.0, y: 6.0 }));
        assert!(sender.offer(GestureEvent::SingleTapUp { x: 5.0, y: 6.0 }));

        let frame = FrameSnapshot::empty();
        coordinator.dispatch_input(Some(&frame));

        assert_eq!(
            *seen.borrow(),
            vec![
                (GestureEvent::Down { x: 5.0, y: 6.0 }, true),
                (GestureEvent::SingleTapUp { x: 5.0, y: 6.0 }, true),
            ]
        );

        // Consumed exactly once: a second dispatch sees nothing.
        coordinator.dispatch_input(Some(&frame));
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn notices_are_forwarded_to_the_status_sink() {
        let mut coordinator = FrameCoordinator::new(GESTURE_QUEUE_CAPACITY);
        let seen = Rc::new(RefCell::new(Vec::new()));
        coordinator.set_status_sink(Box::new(RecordingSink {
            seen: Rc::clone(&seen),
        }));

        coordinator
            .notice_sender()
            .send(ServiceNotice::Progress(75));
        coordinator.dispatch_input(None);

        assert_eq!(*seen.borrow(), vec![ServiceNotice::Progress(75)]);
    }

    #[test]
    fn events_without_a_handler_are_consumed() {
        let mut coordinator = FrameCoordinator::new(GESTURE_QUEUE_CAPACITY);
        let sender = coordinator.gesture_sender();
        assert!(sender.offer(GestureEvent::Down { x: 0.0, y: 0.0 }));

        coordinator.dispatch_input(None);

        // The queue is empty again even though nobody handled the event.
        let seen = Rc::new(RefCell::new(Vec::new()));
        coordinator.set_interaction_handler(Box::new(RecordingHandler {
            seen: Rc::clone(&seen),
        }));
        coordinator.dispatch_input(None);
        assert!(seen.borrow().is_empty());
    }
}
