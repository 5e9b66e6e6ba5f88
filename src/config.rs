//! Configuration types for ropes, physics, orientation and dragging.
//!
//! Every config follows the same builder shape:
//!
//! ```ignore
//! use clothesline::config::{RopeConfig, DragConfig};
//! use glam::Vec3;
//!
//! let rope = RopeConfig::new()
//!     .with_anchors(Vec3::new(-3.0, 2.0, 0.0), Vec3::new(3.0, 2.0, 0.0))
//!     .with_segment_count(56)
//!     .with_rope_length(6.0);
//!
//! let drag = DragConfig::new().with_smoothing_factor(0.2);
//! ```

use std::f32::consts::FRAC_PI_2;

use glam::{Quat, Vec3};

use crate::error::{Result, SceneError};

/// Shape and mass of a single rope.
#[derive(Debug, Clone, PartialEq)]
pub struct RopeConfig {
    /// First anchor (node 0).
    pub start: Vec3,
    /// Last anchor (node `segment_count`).
    pub end: Vec3,
    /// Rest length of the whole rope used as the render reference. Default: 6.0.
    ///
    /// The simulated rest length comes from the anchor distance, so a value
    /// other than [`anchor_distance`](Self::anchor_distance) renders the
    /// rope stretched or compressed at rest.
    pub rope_length: f32,
    /// Number of segments; the rope has `segment_count + 1` nodes. Default: 56.
    pub segment_count: usize,
    /// Total mass spread over the free nodes. Default: 0.1.
    pub total_mass: f32,
}

impl RopeConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self {
            start: Vec3::new(-3.0, 2.0, 0.0),
            end: Vec3::new(3.0, 2.0, 0.0),
            rope_length: 6.0,
            segment_count: 56,
            total_mass: 0.1,
        }
    }

    /// Set both anchor positions.
    pub fn with_anchors(mut self, start: Vec3, end: Vec3) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    /// Set the rest length of the rope.
    pub fn with_rope_length(mut self, rope_length: f32) -> Self {
        self.rope_length = rope_length;
        self
    }

    /// Set the number of segments.
    pub fn with_segment_count(mut self, segment_count: usize) -> Self {
        self.segment_count = segment_count;
        self
    }

    /// Set the total mass of the rope.
    pub fn with_total_mass(mut self, total_mass: f32) -> Self {
        self.total_mass = total_mass;
        self
    }

    /// Number of nodes, anchors included.
    pub fn node_count(&self) -> usize {
        self.segment_count + 1
    }

    /// Straight-line distance between the anchors.
    pub fn anchor_distance(&self) -> f32 {
        self.start.distance(self.end)
    }

    /// Rest length of a single segment.
    pub fn reference_segment_length(&self) -> f32 {
        self.rope_length / self.segment_count as f32
    }

    /// Check that the rope can be built.
    pub fn validate(&self) -> Result<()> {
        if self.segment_count < 2 {
            return Err(SceneError::InvalidConfig(format!(
                "segment_count must be at least 2, got {}",
                self.segment_count
            )));
        }
        if !(self.rope_length.is_finite() && self.rope_length > 0.0) {
            return Err(SceneError::InvalidConfig(format!(
                "rope_length must be positive and finite, got {}",
                self.rope_length
            )));
        }
        if !(self.total_mass.is_finite() && self.total_mass > 0.0) {
            return Err(SceneError::InvalidConfig(format!(
                "total_mass must be positive and finite, got {}",
                self.total_mass
            )));
        }
        Ok(())
    }
}

impl Default for RopeConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Settings for the built-in [`VerletWorld`](crate::physics::VerletWorld).
#[derive(Debug, Clone, PartialEq)]
pub struct WorldConfig {
    /// Gravity acceleration. Default: (0, -9.8, 0).
    pub gravity: Vec3,
    /// Constraint iterations per step. Default: 10.
    pub iterations: usize,
    /// Velocity retained per step, in [0, 1]. Default: 0.99.
    pub damping: f32,
    /// Fixed simulation step in seconds. Default: 1/60.
    pub fixed_delta: f32,
    /// Most fixed steps `FrameLoop::advance` runs per frame. Default: 10.
    pub max_sub_steps: u32,
}

impl WorldConfig {
    pub fn new() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.8, 0.0),
            iterations: 10,
            damping: 0.99,
            fixed_delta: 1.0 / 60.0,
            max_sub_steps: 10,
        }
    }

    pub fn with_gravity(mut self, gravity: Vec3) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations.max(1);
        self
    }

    pub fn with_damping(mut self, damping: f32) -> Self {
        self.damping = damping.clamp(0.0, 1.0);
        self
    }

    pub fn with_fixed_delta(mut self, fixed_delta: f32) -> Self {
        self.fixed_delta = fixed_delta;
        self
    }

    pub fn with_max_sub_steps(mut self, max_sub_steps: u32) -> Self {
        self.max_sub_steps = max_sub_steps.max(1);
        self
    }

    /// Check that the world can be stepped. The fields are public, so the
    /// clamping in the setters is not enough on its own.
    pub fn validate(&self) -> Result<()> {
        if !(self.fixed_delta.is_finite() && self.fixed_delta > 0.0) {
            return Err(SceneError::InvalidConfig(format!(
                "fixed_delta must be positive and finite, got {}",
                self.fixed_delta
            )));
        }
        if !(0.0..=1.0).contains(&self.damping) {
            return Err(SceneError::InvalidConfig(format!(
                "damping must be in [0, 1], got {}",
                self.damping
            )));
        }
        if self.iterations == 0 {
            return Err(SceneError::InvalidConfig("iterations must be at least 1".to_string()));
        }
        if self.max_sub_steps == 0 {
            return Err(SceneError::InvalidConfig("max_sub_steps must be at least 1".to_string()));
        }
        if !self.gravity.is_finite() {
            return Err(SceneError::InvalidConfig(format!(
                "gravity must be finite, got {:?}",
                self.gravity
            )));
        }
        Ok(())
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// How the rope direction at an attachment is flattened before it is used
/// to orient the object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DirectionProjection {
    /// Use the full 3D direction.
    Full,
    /// Remove the component along `normal`, keeping the object in the plane
    /// the rope mostly hangs in.
    Plane { normal: Vec3 },
}

impl DirectionProjection {
    /// Apply the projection to a direction. The result is not normalized.
    pub fn apply(&self, direction: Vec3) -> Vec3 {
        match *self {
            DirectionProjection::Full => direction,
            DirectionProjection::Plane { normal } => {
                let n = normal.normalize_or_zero();
                direction - n * direction.dot(n)
            }
        }
    }
}

/// Orientation rules for attached objects.
#[derive(Debug, Clone, PartialEq)]
pub struct OrientationConfig {
    /// Local axis of the asset that is aligned with the rope direction. Default: +Y.
    pub reference_axis: Vec3,
    /// Projection applied to the rope direction. Default: [`DirectionProjection::Full`].
    pub projection: DirectionProjection,
    /// Fixed local-axis rotations applied after alignment, in order.
    /// Default: a quarter turn about +Z.
    pub corrections: Vec<Quat>,
    /// Directions shorter than this are treated as degenerate. Default: 1e-6.
    pub min_direction_length: f32,
}

impl OrientationConfig {
    pub fn new() -> Self {
        Self {
            reference_axis: Vec3::Y,
            projection: DirectionProjection::Full,
            corrections: vec![Quat::from_axis_angle(Vec3::Z, FRAC_PI_2)],
            min_direction_length: 1e-6,
        }
    }

    pub fn with_reference_axis(mut self, axis: Vec3) -> Self {
        self.reference_axis = axis.normalize_or_zero();
        self
    }

    pub fn with_projection(mut self, projection: DirectionProjection) -> Self {
        self.projection = projection;
        self
    }

    /// Replace the corrective rotations.
    pub fn with_corrections(mut self, corrections: Vec<Quat>) -> Self {
        self.corrections = corrections;
        self
    }

    /// Append one corrective rotation.
    pub fn with_correction(mut self, correction: Quat) -> Self {
        self.corrections.push(correction);
        self
    }

    pub fn with_min_direction_length(mut self, epsilon: f32) -> Self {
        self.min_direction_length = epsilon.max(0.0);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.reference_axis.length_squared() <= f32::EPSILON || !self.reference_axis.is_finite() {
            return Err(SceneError::InvalidConfig(format!(
                "reference_axis must be a non-zero direction, got {:?}",
                self.reference_axis
            )));
        }
        if !self.min_direction_length.is_finite() {
            return Err(SceneError::InvalidConfig(format!(
                "min_direction_length must be finite, got {}",
                self.min_direction_length
            )));
        }
        if let Some(q) = self.corrections.iter().find(|q| !q.is_finite()) {
            return Err(SceneError::InvalidConfig(format!("correction rotation is not finite: {:?}", q)));
        }
        Ok(())
    }

    /// All corrective rotations composed into one, applied on the right.
    pub fn correction(&self) -> Quat {
        self.corrections
            .iter()
            .fold(Quat::IDENTITY, |acc, q| acc * *q)
    }
}

impl Default for OrientationConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Drag smoothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragConfig {
    /// Fraction of the remaining distance covered per move event, in (0, 1].
    /// Default: 0.1.
    pub smoothing_factor: f32,
}

impl DragConfig {
    pub fn new() -> Self {
        Self { smoothing_factor: 0.1 }
    }

    pub fn with_smoothing_factor(mut self, factor: f32) -> Self {
        self.smoothing_factor = factor;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.smoothing_factor > 0.0 && self.smoothing_factor <= 1.0 {
            Ok(())
        } else {
            Err(SceneError::InvalidConfig(format!(
                "smoothing_factor must be in (0, 1], got {}",
                self.smoothing_factor
            )))
        }
    }
}

impl Default for DragConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Layout of a whole scene: several parallel ropes with evenly spaced objects.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    /// Template for every rope; anchor heights are replaced per rope.
    pub rope: RopeConfig,
    /// Anchor height of each rope. Default: [-0.5, 2.0, 4.5].
    pub rope_heights: Vec<f32>,
    /// Objects per rope. Default: 7.
    pub objects_per_rope: usize,
    /// Node spacing between objects. Default: 7.
    pub attachment_stride: usize,
    /// Uniform scale of each attached object. Default: 0.5.
    pub object_scale: f32,
    /// Emit one marker per rope node in the frame view. Default: false.
    pub debug_nodes: bool,
    pub orientation: OrientationConfig,
    pub drag: DragConfig,
    pub world: WorldConfig,
}

impl SceneConfig {
    pub fn new() -> Self {
        Self {
            rope: RopeConfig::new(),
            rope_heights: vec![-0.5, 2.0, 4.5],
            objects_per_rope: 7,
            attachment_stride: 7,
            object_scale: 0.5,
            debug_nodes: false,
            orientation: OrientationConfig::new(),
            drag: DragConfig::new(),
            world: WorldConfig::new(),
        }
    }

    pub fn with_rope(mut self, rope: RopeConfig) -> Self {
        self.rope = rope;
        self
    }

    pub fn with_rope_heights(mut self, heights: Vec<f32>) -> Self {
        self.rope_heights = heights;
        self
    }

    pub fn with_objects_per_rope(mut self, count: usize) -> Self {
        self.objects_per_rope = count;
        self
    }

    pub fn with_attachment_stride(mut self, stride: usize) -> Self {
        self.attachment_stride = stride;
        self
    }

    pub fn with_object_scale(mut self, scale: f32) -> Self {
        self.object_scale = scale;
        self
    }

    pub fn with_debug_nodes(mut self, enabled: bool) -> Self {
        self.debug_nodes = enabled;
        self
    }

    pub fn with_orientation(mut self, orientation: OrientationConfig) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_drag(mut self, drag: DragConfig) -> Self {
        self.drag = drag;
        self
    }

    pub fn with_world(mut self, world: WorldConfig) -> Self {
        self.world = world;
        self
    }

    /// Rope config for the rope hung at `height`.
    pub fn rope_at(&self, height: f32) -> RopeConfig {
        let mut rope = self.rope.clone();
        rope.start.y = height;
        rope.end.y = height;
        rope
    }

    /// Node indices that receive an object: `stride, 2 * stride, ...`.
    pub fn attachment_nodes(&self) -> Vec<usize> {
        (1..=self.objects_per_rope)
            .map(|i| i * self.attachment_stride)
            .collect()
    }

    pub fn validate(&self) -> Result<()> {
        self.rope.validate()?;
        self.world.validate()?;
        self.orientation.validate()?;
        self.drag.validate()?;
        if self.attachment_stride == 0 && self.objects_per_rope > 0 {
            return Err(SceneError::InvalidConfig(
                "attachment_stride must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_segment_length() {
        let rope = RopeConfig::new().with_rope_length(6.0).with_segment_count(20);
        assert_eq!(rope.node_count(), 21);
        assert!((rope.reference_segment_length() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_rope_validation() {
        assert!(RopeConfig::new().validate().is_ok());
        assert!(RopeConfig::new().with_segment_count(1).validate().is_err());
        assert!(RopeConfig::new().with_rope_length(0.0).validate().is_err());
        assert!(RopeConfig::new().with_total_mass(f32::NAN).validate().is_err());
    }

    #[test]
    fn test_world_validation() {
        assert!(WorldConfig::new().validate().is_ok());
        assert!(WorldConfig::new().with_fixed_delta(f32::NAN).validate().is_err());
        assert!(WorldConfig::new().with_fixed_delta(0.0).validate().is_err());
        assert!(WorldConfig::new().with_fixed_delta(-0.01).validate().is_err());
        assert!(WorldConfig::new().with_fixed_delta(f32::INFINITY).validate().is_err());

        let mut config = WorldConfig::new();
        config.damping = 1.5;
        assert!(config.validate().is_err());
        let mut config = WorldConfig::new();
        config.iterations = 0;
        assert!(config.validate().is_err());
        let mut config = WorldConfig::new();
        config.max_sub_steps = 0;
        assert!(config.validate().is_err());

        let scene = SceneConfig::new().with_world(WorldConfig::new().with_fixed_delta(f32::NAN));
        assert!(matches!(scene.validate(), Err(SceneError::InvalidConfig(_))));
    }

    #[test]
    fn test_orientation_validation() {
        assert!(OrientationConfig::new().validate().is_ok());
        assert!(OrientationConfig::new().with_reference_axis(Vec3::ZERO).validate().is_err());
        let bad = OrientationConfig::new().with_correction(Quat::from_xyzw(f32::NAN, 0.0, 0.0, 1.0));
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_drag_factor_range() {
        assert!(DragConfig::new().validate().is_ok());
        assert!(DragConfig::new().with_smoothing_factor(1.0).validate().is_ok());
        assert!(DragConfig::new().with_smoothing_factor(0.0).validate().is_err());
        assert!(DragConfig::new().with_smoothing_factor(1.5).validate().is_err());
    }

    #[test]
    fn test_plane_projection_drops_normal_component() {
        let projection = DirectionProjection::Plane { normal: Vec3::Z };
        let d = projection.apply(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(d, Vec3::new(1.0, 2.0, 0.0));
        assert_eq!(DirectionProjection::Full.apply(Vec3::ONE), Vec3::ONE);
    }

    #[test]
    fn test_default_attachment_layout_avoids_anchors() {
        let scene = SceneConfig::new();
        let nodes = scene.attachment_nodes();
        assert_eq!(nodes, vec![7, 14, 21, 28, 35, 42, 49]);
        let last = scene.rope.segment_count;
        assert!(nodes.iter().all(|&n| n > 0 && n < last));
    }

    #[test]
    fn test_rope_at_height() {
        let scene = SceneConfig::new();
        let rope = scene.rope_at(4.5);
        assert_eq!(rope.start, Vec3::new(-3.0, 4.5, 0.0));
        assert_eq!(rope.end, Vec3::new(3.0, 4.5, 0.0));
    }

    #[test]
    fn test_correction_composition_order() {
        let a = Quat::from_rotation_z(0.3);
        let b = Quat::from_rotation_x(0.7);
        let config = OrientationConfig::new().with_corrections(vec![a, b]);
        assert!(config.correction().abs_diff_eq(a * b, 1e-6));
        let none = OrientationConfig::new().with_corrections(Vec::new());
        assert_eq!(none.correction(), Quat::IDENTITY);
    }
}
