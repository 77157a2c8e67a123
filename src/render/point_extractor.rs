//! Validity filtering: sparse landmark arrays to compact vertex data.

use bytemuck::{Pod, Zeroable};

use crate::constants::BYTES_PER_POINT;
use crate::tracking::{CoordinateSystem, TrackedEntity};

/// One GPU point. Three f32 components, tightly packed.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PointVertex {
    pub position: [f32; 3],
}

static_assertions::const_assert_eq!(
    std::mem::size_of::<PointVertex>() as u64,
    BYTES_PER_POINT
);

/// Compact, validity-filtered vertex data for one entity in one frame.
///
/// Owned by the layer that produced it until upload, discarded after.
#[derive(Debug, Clone)]
pub struct VertexBlock {
    pub points: Vec<PointVertex>,
    /// Forwarded unmodified; the shader applies the per-space draw scale.
    pub coordinate_system: CoordinateSystem,
}

impl VertexBlock {
    pub fn point_count(&self) -> u32 {
        self.points.len() as u32
    }

    pub fn byte_len(&self) -> u64 {
        self.points.len() as u64 * BYTES_PER_POINT
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Copy the landmarks whose existence flag is set, preserving slot order
/// and raw coordinates.
///
/// Linear in the number of landmark slots. Zero valid landmarks yields an
/// empty block, which the caller treats as a skip-draw for this entity
/// this frame, not an error.
pub fn extract_valid_points(entity: &TrackedEntity) -> VertexBlock {
    let mut points = Vec::with_capacity(entity.landmarks.len());
    for landmark in &entity.landmarks {
        if landmark.present {
            points.push(PointVertex {
                position: landmark.position,
            });
        }
    }
    VertexBlock {
        points,
        coordinate_system: entity.coordinate_system,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::{EntityId, EntityKind, Landmark, TrackingState};

    fn entity_with(landmarks: Vec<Landmark>) -> TrackedEntity {
        TrackedEntity {
            id: EntityId(7),
            kind: EntityKind::Body,
            tracking_state: TrackingState::Tracking,
            coordinate_system: CoordinateSystem::Camera3d,
            landmarks,
        }
    }

    #[test]
    fn keeps_only_present_landmarks_in_slot_order() {
        let entity = entity_with(vec![
            Landmark::present([1.0, 1.1, 1.2]),
            Landmark::absent(),
            Landmark::present([3.0, 3.1, 3.2]),
            Landmark::absent(),
            Landmark::present([5.0, 5.1, 5.2]),
        ]);

        let block = extract_valid_points(&entity);
        assert_eq!(block.point_count(), 3);
        assert_eq!(block.points[0].position, [1.0, 1.1, 1.2]);
        assert_eq!(block.points[1].position, [3.0, 3.1, 3.2]);
        assert_eq!(block.points[2].position, [5.0, 5.1, 5.2]);
    }

    #[test]
    fn zero_valid_landmarks_is_an_empty_block() {
        let entity = entity_with(vec![Landmark::absent(); 4]);
        let block = extract_valid_points(&entity);
        assert!(block.is_empty());
        assert_eq!(block.byte_len(), 0);
    }

    #[test]
    fn coordinate_system_is_forwarded_unmodified() {
        let mut entity = entity_with(vec![Landmark::present([0.5, 0.5, 0.0])]);
        entity.coordinate_system = CoordinateSystem::Screen2d;
        let block = extract_valid_points(&entity);
        assert_eq!(block.coordinate_system, CoordinateSystem::Screen2d);
    }

    #[test]
    fn eighteen_slots_twelve_valid_yields_144_bytes() {
        let mut landmarks = Vec::new();
        for slot in 0..18 {
            if slot % 3 == 2 {
                landmarks.push(Landmark::absent());
            } else {
                landmarks.push(Landmark::present([slot as f32, 0.0, 0.0]));
            }
        }
        let block = extract_valid_points(&entity_with(landmarks));
        assert_eq!(block.point_count(), 12);
        assert_eq!(block.byte_len(), 144);
    }
}
