//! Rays, planes, bounding boxes and the transforms used for rope rendering.

use glam::{Mat4, Quat, Vec3};

/// A half-line in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray; `direction` is normalized.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at parameter `t` along the ray.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// An infinite plane through `point` with unit `normal`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub point: Vec3,
    pub normal: Vec3,
}

impl Plane {
    pub fn new(point: Vec3, normal: Vec3) -> Self {
        Self {
            point,
            normal: normal.normalize_or_zero(),
        }
    }

    /// Ray parameter of the intersection, if the ray hits the plane in front
    /// of its origin. Rays parallel to the plane never hit.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let denom = self.normal.dot(ray.direction);
        if denom.abs() < 1e-6 {
            return None;
        }
        let t = self.normal.dot(self.point - ray.origin) / denom;
        (t >= 0.0).then_some(t)
    }
}

/// Axis-aligned box in an object's local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Box centered on the origin.
    pub fn from_half_extents(half_extents: Vec3) -> Self {
        let h = half_extents.abs();
        Self { min: -h, max: h }
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Slab test. Returns the entry parameter, or 0 when the origin is inside.
    ///
    /// `direction` does not need to be normalized; the returned parameter is
    /// in units of `direction`.
    pub fn intersect(&self, origin: Vec3, direction: Vec3) -> Option<f32> {
        let mut t_min = 0.0_f32;
        let mut t_max = f32::INFINITY;

        for axis in 0..3 {
            let o = origin[axis];
            let d = direction[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);

            if d.abs() < 1e-12 {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / d;
            let mut t0 = (lo - o) * inv;
            let mut t1 = (hi - o) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }

        Some(t_min)
    }
}

/// Placement of a rendered object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Quat,
    /// Uniform scale.
    pub scale: f32,
}

impl Pose {
    pub fn new(position: Vec3, orientation: Quat, scale: f32) -> Self {
        Self {
            position,
            orientation,
            scale,
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(Vec3::splat(self.scale), self.orientation, self.position)
    }

    /// Intersect a world ray with a box given in this pose's local space.
    ///
    /// The returned parameter is measured along the world ray, so hits on
    /// differently posed objects can be compared directly.
    pub fn intersect_local_box(&self, ray: &Ray, bounds: &Aabb) -> Option<f32> {
        if self.scale.abs() <= f32::EPSILON {
            return None;
        }
        let inverse = self.matrix().inverse();
        let origin = inverse.transform_point3(ray.origin);
        let direction = inverse.transform_vector3(ray.direction);
        bounds.intersect(origin, direction)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Quat::IDENTITY, 1.0)
    }
}

/// Transform of one rendered rope segment.
///
/// The canonical segment primitive is centered on its origin, runs along +Y
/// and has the rope's reference segment length. Only the Y scale changes, so
/// the cross-section is never distorted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentTransform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl SegmentTransform {
    /// Transform for the segment from `current` to `next`.
    pub fn between(current: Vec3, next: Vec3, reference_length: f32) -> Self {
        let direction = next - current;
        let length = direction.length();
        let rotation = if length > f32::EPSILON {
            Quat::from_rotation_arc(Vec3::Y, direction / length)
        } else {
            Quat::IDENTITY
        };
        Self {
            translation: (current + next) * 0.5,
            rotation,
            scale: Vec3::new(1.0, length / reference_length, 1.0),
        }
    }

    /// Stretch factor relative to the rest length.
    pub fn stretch(&self) -> f32 {
        self.scale.y
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

impl Default for SegmentTransform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}
