//! Error handling for the overlay engine.
//!
//! One enum per failure domain. Session errors follow the tracking
//! runtime's taxonomy; graphics errors are scoped to a single overlay
//! layer and never take the process down.

use thiserror::Error;

/// Failures from capability checks, session creation and configuration.
///
/// `RuntimeMissing` is recoverable through the install redirect; every
/// other variant is terminal for the current session instance. The
/// `Display` text is the single human-readable message surfaced to the
/// host for each reason.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("please install the tracking runtime to continue")]
    RuntimeMissing,

    #[error("please update the tracking runtime service")]
    RuntimeTooOld,

    #[error("please update this app")]
    ClientTooOld,

    #[error("the configuration is not supported by the device")]
    UnsupportedConfiguration,

    #[error("camera open failed, please restart the app")]
    CameraUnavailable,

    #[error("unknown tracking runtime error: {0}")]
    Unknown(String),
}

/// Graphics-resource failures, fatal for the affected layer only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphicsError {
    #[error("buffer growth to {requested} bytes exceeds the device limit of {limit} bytes")]
    BufferExhausted { requested: u64, limit: u64 },
}

/// Invalid [`OverlayConfig`](crate::config::OverlayConfig) values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("initial_point_capacity cannot be 0")]
    ZeroInitialCapacity,

    #[error("gesture_queue_capacity cannot be 0")]
    ZeroQueueCapacity,

    #[error("point size {0} is outside the supported range 1.0..=256.0")]
    PointSizeOutOfRange(f32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_error_messages_are_user_facing() {
        assert_eq!(
            SessionError::RuntimeTooOld.to_string(),
            "please update the tracking runtime service"
        );
        assert_eq!(
            SessionError::CameraUnavailable.to_string(),
            "camera open failed, please restart the app"
        );
    }

    #[test]
    fn graphics_error_reports_sizes() {
        let err = GraphicsError::BufferExhausted {
            requested: 4096,
            limit: 2048,
        };
        assert_eq!(
            err.to_string(),
            "buffer growth to 4096 bytes exceeds the device limit of 2048 bytes"
        );
    }
}
