//! Pipeline-wide constants.

/// Bytes occupied by one uploaded point: three f32 components, tightly
/// packed.
pub const BYTES_PER_POINT: u64 = 4 * 3;

/// Vertex-buffer starting capacity, in points. Covers every landmark set
/// the tracking engine produces today; larger bursts trigger capacity
/// doubling.
pub const INITIAL_POINT_CAPACITY: u64 = 150;

/// Uniform-slot starting capacity, in tracked entities per layer per frame.
pub const INITIAL_ENTITY_SLOTS: u64 = 8;

/// Scale the point shader applies to camera-relative 3D positions.
pub const CAMERA_SPACE_DRAW_SCALE: f32 = 2.0;

/// Scale the point shader applies to screen-relative 2D positions.
pub const SCREEN_SPACE_DRAW_SCALE: f32 = 1.0;

/// Gesture queue bound. Only the most recent unconsumed gestures matter for
/// hit-testing; anything older is stale input, not a backlog.
pub const GESTURE_QUEUE_CAPACITY: usize = 2;
