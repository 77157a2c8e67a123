//! External collaborator interfaces for the tracking engine.
//!
//! The tracking runtime and its sessions are opaque to this crate: the
//! host supplies an implementation backed by the real engine, and tests
//! supply mocks.

use crate::error::SessionError;
use crate::tracking::FrameSnapshot;

/// Capability interface for the tracking-engine runtime.
pub trait RuntimeProbe {
    /// Whether the tracking runtime is installed on the device.
    fn is_available(&self) -> bool;

    /// Redirect the user to the runtime's install flow.
    fn request_install(&mut self);
}

/// The opaque session handle. Capture and tracking run on the engine's
/// own threads; this crate only reads the latest-frame snapshot.
pub trait TrackingSession {
    /// Re-acquire the camera and restart frame production.
    fn resume(&mut self) -> Result<(), SessionError>;

    /// Release the camera and stop frame production. Synchronous: no new
    /// frames are observable after this returns.
    fn pause(&mut self);

    /// Release the underlying session unconditionally.
    fn stop(&mut self);

    /// Latest frame snapshot, or `None` when nothing new has been
    /// produced since the last call. Never blocks.
    fn latest_frame(&mut self) -> Option<FrameSnapshot>;

    /// Forward surface dimensions to the tracking engine.
    fn set_display_size(&mut self, _width: u32, _height: u32) {}
}

/// Creates and configures sessions against the runtime it probes.
pub trait SessionFactory: RuntimeProbe {
    /// Create a session and apply the tracking configuration, validating
    /// it against the device and runtime versions.
    fn create_session(&mut self) -> Result<Box<dyn TrackingSession>, SessionError>;
}
