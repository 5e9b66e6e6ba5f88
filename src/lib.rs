//! # clothesline
//!
//! A rope simulated as a chain of particles, with objects clipped onto it at
//! fixed nodes that the user can grab and drag.
//!
//! The crate is the synchronization layer between a soft-body simulation and
//! the rendered scene:
//!
//! - [`Rope`] mirrors one simulated rope: node indices, rest segment length
//!   and the attachment map. Every frame it copies node positions into the
//!   attached objects and rebuilds one transform per segment.
//! - [`AttachedObject`] sits exactly on its node and orients itself along
//!   the rope.
//! - [`InteractionController`] picks the nearest object under the pointer and,
//!   while dragging, eases a target toward the pointer and writes it back
//!   into the simulation.
//! - [`FrameLoop`] ties it together: step, synchronize, orient, render.
//!
//! Physics sits behind the [`PhysicsEngine`] trait and rendering behind
//! [`RenderSink`]. [`VerletWorld`] is a built-in rope solver.
//!
//! ## Quick Start
//!
//! ```ignore
//! use clothesline::prelude::*;
//!
//! let config = SceneConfig::new();
//! let mut frame_loop = FrameLoop::from_scene(
//!     VerletWorld::new(config.world.clone()),
//!     NullRenderer,
//!     &config,
//!     MeshHandle(0),
//!     Aabb::from_half_extents(Vec3::new(0.3, 0.4, 0.05)),
//! )?;
//!
//! frame_loop.on_pointer_down(Vec2::new(400.0, 300.0));
//! frame_loop.on_pointer_move(Vec2::new(420.0, 280.0));
//! frame_loop.tick();
//! frame_loop.on_pointer_up();
//! ```

pub mod attachment;
pub mod camera;
pub mod config;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod input;
pub mod interaction;
pub mod physics;
pub mod render;
pub mod rope;
pub mod time;

pub use attachment::AttachedObject;
pub use camera::Camera;
pub use config::{DirectionProjection, DragConfig, OrientationConfig, RopeConfig, SceneConfig, WorldConfig};
pub use error::{AttachError, Result, SceneError};
pub use frame::FrameLoop;
pub use geometry::{Aabb, Plane, Pose, Ray, SegmentTransform};
pub use glam::{Quat, Vec2, Vec3};
pub use input::{Pointer, PointerEvent};
pub use interaction::{DragSession, DragState, InteractionController};
pub use physics::{PhysicsEngine, RopeHandle, VerletWorld};
pub use render::{FrameView, MeshHandle, NullRenderer, ObjectView, RenderSink, RopeView, SegmentInstance};
pub use rope::{ObjectKey, Rope};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use clothesline::prelude::*;
/// ```
pub mod prelude {
    pub use crate::attachment::AttachedObject;
    pub use crate::camera::Camera;
    pub use crate::config::{DirectionProjection, DragConfig, OrientationConfig, RopeConfig, SceneConfig, WorldConfig};
    pub use crate::frame::FrameLoop;
    pub use crate::geometry::Aabb;
    pub use crate::interaction::InteractionController;
    pub use crate::physics::{PhysicsEngine, VerletWorld};
    pub use crate::render::{FrameView, MeshHandle, NullRenderer, RenderSink};
    pub use crate::rope::{ObjectKey, Rope};
    pub use crate::{Quat, Vec2, Vec3};
}
