//! Objects clipped onto a rope node.
//!
//! An attached object's position is always the position of its node; it
//! never smooths or resists that write. Its orientation follows the local
//! rope direction between the node and its predecessor.

use glam::{Quat, Vec3};

use crate::config::OrientationConfig;
use crate::geometry::{Aabb, Pose, Ray};
use crate::render::MeshHandle;

/// A renderable entity bound to one rope node.
#[derive(Debug, Clone, PartialEq)]
pub struct AttachedObject {
    mesh: MeshHandle,
    bounds: Aabb,
    pose: Pose,
    node: Option<usize>,
}

impl AttachedObject {
    /// Create an unattached object with pickable local-space `bounds`.
    pub fn new(mesh: MeshHandle, bounds: Aabb) -> Self {
        Self {
            mesh,
            bounds,
            pose: Pose::default(),
            node: None,
        }
    }

    /// Set the uniform scale.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.pose.scale = scale;
        self
    }

    /// Set the pose used until the first synchronization.
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.pose.position = position;
        self
    }

    pub fn mesh(&self) -> MeshHandle {
        self.mesh
    }

    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    pub fn position(&self) -> Vec3 {
        self.pose.position
    }

    pub fn orientation(&self) -> Quat {
        self.pose.orientation
    }

    /// Node this object is bound to, once attached.
    pub fn node_index(&self) -> Option<usize> {
        self.node
    }

    pub(crate) fn bind(&mut self, node: usize) {
        self.node = Some(node);
    }

    /// Place the object exactly at `position`.
    pub fn update_position(&mut self, position: Vec3) {
        self.pose.position = position;
    }

    /// Orient the object along the rope, given its node position and the
    /// position of the preceding node.
    ///
    /// Returns `false` and keeps the previous orientation when the projected
    /// direction is too short to normalize.
    pub fn update_orientation(&mut self, current: Vec3, previous: Vec3, config: &OrientationConfig) -> bool {
        let direction = config.projection.apply(current - previous);
        let length = direction.length();
        if length.is_nan() || length <= config.min_direction_length {
            log::trace!("skipping orientation update: degenerate rope direction {direction:?}");
            return false;
        }

        let aligned = Quat::from_rotation_arc(config.reference_axis, direction / length);
        self.pose.orientation = (aligned * config.correction()).normalize();
        true
    }

    /// Ray parameter of the nearest hit on this object's bounds.
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        self.pose.intersect_local_box(ray, &self.bounds)
    }
}
