//! Overlay Engine - real-time tracking overlays on a camera preview.
//!
//! The host application owns the window, the surface and the tracking
//! engine; this crate owns the render-loop core:
//! - validity-filtered point extraction from tracked-entity snapshots,
//! - growable GPU vertex storage that absorbs bursty point counts,
//! - a bounded, non-blocking gesture bridge from the UI thread,
//! - the tracking-session lifecycle state machine,
//! - per-tick frame coordination across the overlay layers.
//!
//! Two threads matter: the UI thread producing gestures, and the render
//! thread that exclusively owns all GPU state. Tracking runs on the
//! external engine's own threads and is only ever observed through
//! non-blocking latest-frame snapshots.

pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod input;
pub mod render;
pub mod session;
pub mod tracking;

pub use config::{LayerStyle, OverlayConfig};
pub use engine::OverlayEngine;
pub use error::{ConfigError, GraphicsError, SessionError};
pub use input::{GestureEvent, GestureSender};
pub use render::{
    BackdropLayer, BackdropSource, DynamicVertexBuffer, FrameCoordinator, HandLayer,
    InteractionHandler, OverlayLayer, PlaneLayer, RenderContext, SkeletonLayer, VertexBlock,
};
pub use session::{
    NoticeSender, RuntimeProbe, ServiceNotice, SessionFactory, SessionLifecycle, SessionState,
    StartOutcome, StatusSink, TrackingSession,
};
pub use tracking::{
    CoordinateSystem, EntityId, EntityKind, FrameSnapshot, Landmark, TrackedEntity, TrackingState,
};

// Re-export wgpu so hosts build against the same GPU types.
pub use wgpu;
