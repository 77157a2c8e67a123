//! Tracking data model.
//!
//! Read-only snapshots produced once per frame by the external tracking
//! engine. The rendering core never mutates them; each snapshot is
//! consumed once per draw tick.

pub mod entity;
pub mod snapshot;

pub use entity::{CoordinateSystem, EntityId, EntityKind, Landmark, TrackedEntity, TrackingState};
pub use snapshot::FrameSnapshot;
