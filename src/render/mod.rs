//! GPU overlay rendering.
//!
//! All types in this module are owned by the render thread; buffer,
//! pipeline and bind-group handles never cross threads.

pub mod backdrop;
pub mod coordinator;
pub mod layer;
pub mod layers;
pub mod pipeline;
pub mod point_extractor;
pub mod vertex_buffer;

pub use backdrop::{BackdropLayer, BackdropSource};
pub use coordinator::{FrameCoordinator, InteractionHandler};
pub use layer::{OverlayLayer, RenderContext};
pub use layers::{HandLayer, PlaneLayer, SkeletonLayer};
pub use point_extractor::{extract_valid_points, PointVertex, VertexBlock};
pub use vertex_buffer::DynamicVertexBuffer;
