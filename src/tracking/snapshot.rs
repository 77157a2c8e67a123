//! The per-frame unit handed over by the tracking producer.

use glam::Mat4;

use super::TrackedEntity;

/// One frame's worth of tracking output.
///
/// The projection matrix rides with the frame because the tracking engine
/// recomputes it from the camera every capture tick.
#[derive(Debug, Clone)]
pub struct FrameSnapshot {
    pub projection: Mat4,
    pub entities: Vec<TrackedEntity>,
}

impl FrameSnapshot {
    /// A frame with no tracked entities and an identity projection.
    pub fn empty() -> Self {
        Self {
            projection: Mat4::IDENTITY,
            entities: Vec::new(),
        }
    }
}
