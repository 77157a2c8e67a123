//! Overlay pipeline configuration.

use crate::constants::{GESTURE_QUEUE_CAPACITY, INITIAL_POINT_CAPACITY};
use crate::error::ConfigError;

/// Color and sizing of one point overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerStyle {
    /// RGBA overlay color.
    pub color: [f32; 4],
    /// Point size in framebuffer pixels.
    pub point_size_px: f32,
}

/// Tunables for the overlay pipeline. Per-instance, so concurrent
/// engines (tests) do not interfere.
#[derive(Debug, Clone)]
pub struct OverlayConfig {
    /// Vertex-buffer starting capacity per layer, in points.
    pub initial_point_capacity: u64,
    /// Gesture queue bound.
    pub gesture_queue_capacity: usize,
    pub skeleton_style: LayerStyle,
    pub hand_style: LayerStyle,
    pub plane_style: LayerStyle,
    /// Fill color where no camera image is available.
    pub clear_color: wgpu::Color,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            initial_point_capacity: INITIAL_POINT_CAPACITY,
            gesture_queue_capacity: GESTURE_QUEUE_CAPACITY,
            skeleton_style: LayerStyle {
                color: [0.0, 0.0, 1.0, 1.0],
                point_size_px: 30.0,
            },
            hand_style: LayerStyle {
                color: [0.0, 1.0, 0.3, 1.0],
                point_size_px: 25.0,
            },
            plane_style: LayerStyle {
                color: [1.0, 0.8, 0.0, 0.6],
                point_size_px: 10.0,
            },
            clear_color: wgpu::Color::BLACK,
        }
    }
}

impl OverlayConfig {
    /// Validate configuration parameters before the pipeline is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_point_capacity == 0 {
            return Err(ConfigError::ZeroInitialCapacity);
        }
        if self.gesture_queue_capacity == 0 {
            return Err(ConfigError::ZeroQueueCapacity);
        }
        for style in [self.skeleton_style, self.hand_style, self.plane_style] {
            if !(1.0..=256.0).contains(&style.point_size_px) {
                return Err(ConfigError::PointSizeOutOfRange(style.point_size_px));
            }
        }
        log::debug!("[OverlayConfig::validate] configuration validated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(OverlayConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_capacities_are_rejected() {
        let mut config = OverlayConfig::default();
        config.initial_point_capacity = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroInitialCapacity));

        let mut config = OverlayConfig::default();
        config.gesture_queue_capacity = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroQueueCapacity));
    }

    #[test]
    fn absurd_point_sizes_are_rejected() {
        let mut config = OverlayConfig::default();
        config.hand_style.point_size_px = 0.0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::PointSizeOutOfRange(0.0))
        );
    }
}
