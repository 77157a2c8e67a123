//! Per-frame tracked-entity snapshots.

/// Stable identifier assigned by the tracking engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(pub u32);

/// Which overlay family an entity belongs to. Each overlay layer draws
/// exactly one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Body,
    Hand,
    Plane,
}

/// Tracking-engine state for one entity. Only `Tracking` entities are
/// drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingState {
    Tracking,
    Paused,
    Stopped,
}

/// Coordinate space the landmark positions are expressed in.
///
/// Camera-relative 3D positions are rescaled by the point shader
/// ([`CAMERA_SPACE_DRAW_SCALE`](crate::constants::CAMERA_SPACE_DRAW_SCALE));
/// screen-relative 2D positions pass through unscaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateSystem {
    Camera3d,
    Screen2d,
}

/// One landmark slot: a position plus an existence flag.
///
/// Slots without the flag carry undefined positions and must be skipped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landmark {
    pub position: [f32; 3],
    pub present: bool,
}

impl Landmark {
    /// A slot whose existence flag is set.
    pub fn present(position: [f32; 3]) -> Self {
        Self {
            position,
            present: true,
        }
    }

    /// An empty slot.
    pub fn absent() -> Self {
        Self {
            position: [0.0; 3],
            present: false,
        }
    }
}

/// One tracked body, hand or plane for one frame.
#[derive(Debug, Clone)]
pub struct TrackedEntity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub tracking_state: TrackingState,
    pub coordinate_system: CoordinateSystem,
    /// Sparse landmark slots in the tracking engine's fixed slot order.
    pub landmarks: Vec<Landmark>,
}
