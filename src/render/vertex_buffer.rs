//! Growable GPU vertex storage.
//!
//! Capacity grows geometrically and never shrinks across the buffer's
//! lifetime, so bursty per-frame point counts do not thrash reallocation.

use crate::constants::BYTES_PER_POINT;
use crate::error::GraphicsError;
use crate::render::point_extractor::PointVertex;

/// Decide the capacity to grow to, doubling `current` until `required`
/// fits. Returns `Ok(None)` when the current capacity already suffices,
/// and an error when the result would exceed `limit`.
///
/// Pure so the growth policy is testable without a device.
pub(crate) fn plan_growth(
    current: u64,
    required: u64,
    limit: u64,
) -> Result<Option<u64>, GraphicsError> {
    debug_assert!(current > 0, "vertex buffers are never zero-capacity");
    if required <= current {
        return Ok(None);
    }
    let mut capacity = current;
    while capacity < required {
        capacity = capacity
            .checked_mul(2)
            .ok_or(GraphicsError::BufferExhausted {
                requested: u64::MAX,
                limit,
            })?;
    }
    if capacity > limit {
        return Err(GraphicsError::BufferExhausted {
            requested: capacity,
            limit,
        });
    }
    Ok(Some(capacity))
}

/// A vertex buffer that doubles its GPU store to fit variable per-frame
/// point counts.
pub struct DynamicVertexBuffer {
    buffer: wgpu::Buffer,
    capacity_bytes: u64,
    point_count: u32,
    limit_bytes: u64,
    label: &'static str,
}

impl DynamicVertexBuffer {
    /// Allocate the initial store. Render thread only.
    pub fn new(device: &wgpu::Device, label: &'static str, initial_points: u64) -> Self {
        let capacity_bytes = initial_points * BYTES_PER_POINT;
        Self {
            buffer: create_store(device, label, capacity_bytes),
            capacity_bytes,
            point_count: 0,
            limit_bytes: device.limits().max_buffer_size,
            label,
        }
    }

    /// Double capacity until `required_bytes` fits, reallocating the GPU
    /// store with undefined contents. No-op when capacity already
    /// suffices. Failure is fatal for this buffer, not the process.
    pub fn ensure_capacity(
        &mut self,
        device: &wgpu::Device,
        required_bytes: u64,
    ) -> Result<(), GraphicsError> {
        if let Some(grown) = plan_growth(self.capacity_bytes, required_bytes, self.limit_bytes)? {
            log::debug!(
                "[DynamicVertexBuffer::ensure_capacity] {}: {} -> {} bytes",
                self.label,
                self.capacity_bytes,
                grown
            );
            self.buffer = create_store(device, self.label, grown);
            self.capacity_bytes = grown;
        }
        Ok(())
    }

    /// Write `points` starting at offset 0 and record the occupied count.
    /// A sub-range update when capacity suffices, a reallocation plus
    /// write when it does not.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        points: &[PointVertex],
    ) -> Result<(), GraphicsError> {
        self.ensure_capacity(device, points.len() as u64 * BYTES_PER_POINT)?;
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(points));
        self.point_count = points.len() as u32;
        Ok(())
    }

    /// Occupied point count of the last upload.
    pub fn point_count(&self) -> u32 {
        self.point_count
    }

    pub fn capacity_bytes(&self) -> u64 {
        self.capacity_bytes
    }

    pub fn slice(&self) -> wgpu::BufferSlice<'_> {
        self.buffer.slice(..)
    }
}

fn create_store(device: &wgpu::Device, label: &'static str, size: u64) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::INITIAL_POINT_CAPACITY;

    const INITIAL_BYTES: u64 = INITIAL_POINT_CAPACITY * BYTES_PER_POINT;
    const LIMIT: u64 = 1 << 28;

    #[test]
    fn sufficient_capacity_needs_no_growth() {
        // Scenario: 12 points at 12 bytes each fit the 1800-byte initial
        // store without reallocation.
        assert_eq!(plan_growth(INITIAL_BYTES, 144, LIMIT), Ok(None));
        assert_eq!(plan_growth(INITIAL_BYTES, INITIAL_BYTES, LIMIT), Ok(None));
    }

    #[test]
    fn growth_doubles_until_sufficient() {
        assert_eq!(
            plan_growth(INITIAL_BYTES, INITIAL_BYTES + 1, LIMIT),
            Ok(Some(INITIAL_BYTES * 2))
        );
        assert_eq!(
            plan_growth(INITIAL_BYTES, INITIAL_BYTES * 5, LIMIT),
            Ok(Some(INITIAL_BYTES * 8))
        );
    }

    #[test]
    fn capacity_is_a_power_of_two_multiple_and_monotonic() {
        let uploads: [u64; 6] = [144, 3000, 120, 9000, 9000, 60];
        let mut capacity = INITIAL_BYTES;
        let mut expected = INITIAL_BYTES;
        for required in uploads {
            if let Some(grown) = plan_growth(capacity, required, LIMIT).unwrap() {
                capacity = grown;
            }

            // Oracle: the smallest power-of-two multiple of the initial
            // capacity that fits this upload, never shrinking.
            let mut needed = INITIAL_BYTES;
            while needed < required {
                needed *= 2;
            }
            expected = expected.max(needed);

            assert_eq!(capacity, expected);
            assert!((capacity / INITIAL_BYTES).is_power_of_two());
        }
    }

    #[test]
    fn growth_past_the_device_limit_is_rejected() {
        let err = plan_growth(1024, 5000, 4096).unwrap_err();
        assert_eq!(
            err,
            GraphicsError::BufferExhausted {
                requested: 8192,
                limit: 4096,
            }
        );
    }

    #[test]
    fn overflowing_growth_is_rejected() {
        assert!(plan_growth(1 << 63, u64::MAX, u64::MAX).is_err());
    }
}
