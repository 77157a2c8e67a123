//! Bounded gesture queue between the UI thread and the render loop.
//!
//! Deliberately tiny: only the most recent unconsumed gestures are
//! meaningful for hit-testing, so a full queue rejects new events instead
//! of blocking or overwriting. Single producer (UI thread), single
//! consumer (render thread).

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

/// An input gesture captured on the UI thread, with the originating
/// screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    Down { x: f32, y: f32 },
    SingleTapUp { x: f32, y: f32 },
    Scroll { x: f32, y: f32, dx: f32, dy: f32 },
}

/// Producer half of the queue. Cloneable onto the UI thread.
#[derive(Debug, Clone)]
pub struct GestureSender {
    tx: Sender<GestureEvent>,
}

impl GestureSender {
    /// Non-blocking enqueue. Returns `false` when the queue is at
    /// capacity; the event is dropped, the rejection is logged and never
    /// retried.
    pub fn offer(&self, event: GestureEvent) -> bool {
        match self.tx.try_send(event) {
            Ok(()) => {
                log::debug!("[GestureSender::offer] queued {:?}", event);
                true
            }
            Err(TrySendError::Full(rejected)) => {
                log::debug!("[GestureSender::offer] queue full, rejected {:?}", rejected);
                false
            }
            Err(TrySendError::Disconnected(rejected)) => {
                log::debug!(
                    "[GestureSender::offer] render loop gone, dropped {:?}",
                    rejected
                );
                false
            }
        }
    }
}

/// Consumer half of the queue. Owned by the render loop.
#[derive(Debug)]
pub struct GestureQueue {
    tx: Sender<GestureEvent>,
    rx: Receiver<GestureEvent>,
}

impl GestureQueue {
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = bounded(capacity);
        Self { tx, rx }
    }

    /// Hand a producer handle to the UI thread.
    pub fn sender(&self) -> GestureSender {
        GestureSender {
            tx: self.tx.clone(),
        }
    }

    /// Remove and return all queued events in FIFO order, without
    /// blocking. Called once per render tick, render thread only.
    pub fn drain(&self) -> Vec<GestureEvent> {
        self.rx.try_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::GESTURE_QUEUE_CAPACITY;

    #[test]
    fn drains_in_submission_order() {
        let queue = GestureQueue::new(GESTURE_QUEUE_CAPACITY);
        let sender = queue.sender();

        assert!(sender.offer(GestureEvent::Down { x: 1.0, y: 2.0 }));
        assert!(sender.offer(GestureEvent::SingleTapUp { x: 3.0, y: 4.0 }));

        assert_eq!(
            queue.drain(),
            vec![
                GestureEvent::Down { x: 1.0, y: 2.0 },
                GestureEvent::SingleTapUp { x: 3.0, y: 4.0 },
            ]
        );
    }

    #[test]
    fn third_offer_is_rejected_at_capacity_two() {
        let queue = GestureQueue::new(GESTURE_QUEUE_CAPACITY);
        let sender = queue.sender();

        let down = GestureEvent::Down { x: 10.0, y: 10.0 };
        let scroll = GestureEvent::Scroll {
            x: 10.0,
            y: 10.0,
            dx: -4.0,
            dy: 2.5,
        };
        let tap = GestureEvent::SingleTapUp { x: 11.0, y: 9.0 };

        assert!(sender.offer(down));
        assert!(sender.offer(scroll));
        assert!(!sender.offer(tap));

        assert_eq!(queue.drain(), vec![down, scroll]);
    }

    #[test]
    fn draining_empty_queue_returns_nothing() {
        let queue = GestureQueue::new(GESTURE_QUEUE_CAPACITY);
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn capacity_frees_up_after_drain() {
        let queue = GestureQueue::new(GESTURE_QUEUE_CAPACITY);
        let sender = queue.sender();
        let event = GestureEvent::Down { x: 0.0, y: 0.0 };

        assert!(sender.offer(event));
        assert!(sender.offer(event));
        assert!(!sender.offer(event));

        queue.drain();
        assert!(sender.offer(event));
    }
}
