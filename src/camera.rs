//! Perspective camera with screen-to-ray unprojection.

use glam::{Mat4, Vec2, Vec3};

use crate::geometry::Ray;

/// Camera orbiting a target point.
///
/// With the default yaw and pitch of zero it sits on the +Z axis looking
/// down -Z, which is how rope scenes are framed.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Horizontal rotation angle in radians.
    pub yaw: f32,
    /// Vertical rotation angle in radians.
    pub pitch: f32,
    /// Distance from the target point.
    pub distance: f32,
    /// Point the camera looks at.
    pub target: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// Camera 10 units in front of the origin with a 75 degree field of view.
    pub fn new() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            distance: 10.0,
            target: Vec3::ZERO,
            fov_y: 75f32.to_radians(),
            near: 0.1,
            far: 1000.0,
        }
    }

    /// Calculate the camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    /// Unit vector the camera looks along.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position()).normalize_or_zero()
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, aspect, self.near, self.far)
    }

    pub fn view_projection(&self, viewport: Vec2) -> Mat4 {
        self.projection_matrix(aspect(viewport)) * self.view_matrix()
    }

    /// Ray from the eye through a pixel. `screen` is in pixels with the
    /// origin at the top-left corner of a `viewport`-sized surface.
    pub fn screen_to_ray(&self, screen: Vec2, viewport: Vec2) -> Ray {
        let ndc = screen_to_ndc(screen, viewport);
        let inverse = self.view_projection(viewport).inverse();
        let near = inverse.project_point3(ndc.extend(0.0));
        let far = inverse.project_point3(ndc.extend(1.0));
        Ray::new(self.position(), far - near)
    }

    /// Pixel a world point projects to. Points behind the camera return `None`.
    pub fn world_to_screen(&self, point: Vec3, viewport: Vec2) -> Option<Vec2> {
        let clip = self.view_projection(viewport) * point.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(Vec2::new(
            (ndc.x + 1.0) * 0.5 * viewport.x,
            (1.0 - ndc.y) * 0.5 * viewport.y,
        ))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert pixels to normalized device coordinates (-1 to 1, Y up).
pub fn screen_to_ndc(screen: Vec2, viewport: Vec2) -> Vec2 {
    if viewport.x <= 0.0 || viewport.y <= 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new(
        (screen.x / viewport.x) * 2.0 - 1.0,
        1.0 - (screen.y / viewport.y) * 2.0, // Y flipped
    )
}

fn aspect(viewport: Vec2) -> f32 {
    if viewport.y > 0.0 {
        viewport.x / viewport.y
    } else {
        1.0
    }
}
