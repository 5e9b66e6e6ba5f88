//! Renderer boundary.
//!
//! The crate never draws anything itself. Each frame it hands a
//! [`FrameView`] to a [`RenderSink`]: one instance buffer per rope, a pose
//! per attached object, and optional node markers.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::camera::Camera;
use crate::geometry::{Pose, SegmentTransform};
use crate::rope::ObjectKey;

/// Opaque handle to geometry owned by the asset provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub u64);

/// Per-instance record for instanced segment geometry.
///
/// Laid out as four column vectors so it can be uploaded as-is.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct SegmentInstance {
    pub model: [[f32; 4]; 4],
}

impl SegmentInstance {
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.model)
    }
}

impl From<&SegmentTransform> for SegmentInstance {
    fn from(transform: &SegmentTransform) -> Self {
        Self {
            model: transform.matrix().to_cols_array_2d(),
        }
    }
}

/// Segments and optional node markers of one rope.
#[derive(Debug, Clone, Copy)]
pub struct RopeView<'a> {
    pub rope: usize,
    pub segments: &'a [SegmentInstance],
    pub nodes: Option<&'a [Vec3]>,
}

/// Where to draw one attached object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectView {
    pub key: ObjectKey,
    pub mesh: MeshHandle,
    pub pose: Pose,
    /// Whether the object is the current drag target.
    pub dragged: bool,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone)]
pub struct FrameView<'a> {
    pub frame: u64,
    pub camera: &'a Camera,
    pub ropes: Vec<RopeView<'a>>,
    pub objects: Vec<ObjectView>,
}

impl FrameView<'_> {
    /// Total number of segment instances across all ropes.
    pub fn segment_count(&self) -> usize {
        self.ropes.iter().map(|r| r.segments.len()).sum()
    }
}

/// Receives one [`FrameView`] per frame.
pub trait RenderSink {
    fn render(&mut self, frame: &FrameView<'_>);
}

/// Discards every frame. Useful for headless runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl RenderSink for NullRenderer {
    fn render(&mut self, _frame: &FrameView<'_>) {}
}
