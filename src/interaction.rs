//! Pick, drag and release of attached objects.
//!
//! The controller is a two-state machine:
//!
//! - `Idle` → `Dragging` on pointer down when the pointer ray hits an
//!   attached object (nearest hit wins).
//! - While `Dragging`, every pointer move intersects the ray with a plane at
//!   the object's pick-time depth, eases the smoothed target toward that
//!   point and writes it into physics through [`Rope::set_node_position`].
//! - `Dragging` → `Idle` on pointer up. The node is left to the simulation;
//!   its inverse mass is never touched.
//!
//! The smoothed target starts at the object's position at pick time, so the
//! first move yields `start + (raw - start) * smoothing_factor`.

use glam::{Vec2, Vec3};

use crate::camera::Camera;
use crate::config::DragConfig;
use crate::geometry::{Plane, Ray};
use crate::physics::PhysicsEngine;
use crate::rope::{ObjectKey, Rope};

/// State of an in-progress drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    target: ObjectKey,
    smoothed: Vec3,
    plane: Plane,
}

impl DragSession {
    /// Object being dragged.
    pub fn target(&self) -> ObjectKey {
        self.target
    }

    /// Last smoothed target position.
    pub fn smoothed_target(&self) -> Vec3 {
        self.smoothed
    }

    /// Constant-depth plane the pointer is projected onto.
    pub fn plane(&self) -> Plane {
        self.plane
    }
}

/// Whether a drag is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

/// Turns pointer events into drag overrides.
#[derive(Debug, Clone)]
pub struct InteractionController {
    config: DragConfig,
    state: DragState,
}

impl InteractionController {
    pub fn new(config: DragConfig) -> Self {
        Self {
            config,
            state: DragState::Idle,
        }
    }

    pub fn config(&self) -> &DragConfig {
        &self.config
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    pub fn session(&self) -> Option<&DragSession> {
        match &self.state {
            DragState::Dragging(session) => Some(session),
            DragState::Idle => None,
        }
    }

    /// Object currently being dragged.
    pub fn target(&self) -> Option<ObjectKey> {
        self.session().map(|s| s.target)
    }

    /// Nearest attached object hit by `ray`, with its ray parameter.
    ///
    /// Equal distances resolve to the lowest `(rope, node)` key.
    pub fn pick(ray: &Ray, ropes: &[Rope]) -> Option<(ObjectKey, f32)> {
        let mut best: Option<(ObjectKey, f32)> = None;
        for (rope_index, rope) in ropes.iter().enumerate() {
            for (node, object) in rope.objects() {
                let Some(t) = object.intersect(ray) else {
                    continue;
                };
                if best.map_or(true, |(_, best_t)| t < best_t) {
                    best = Some((ObjectKey { rope: rope_index, node }, t));
                }
            }
        }
        best
    }

    /// Start dragging the object under the pointer, if any.
    ///
    /// A press while already dragging abandons the old session first.
    pub fn on_pointer_down(
        &mut self,
        screen: Vec2,
        viewport: Vec2,
        camera: &Camera,
        ropes: &[Rope],
    ) -> Option<ObjectKey> {
        if let Some(previous) = self.target() {
            log::debug!("pointer down during drag of {previous:?}; ending it");
            self.state = DragState::Idle;
        }

        let ray = camera.screen_to_ray(screen, viewport);
        let (key, _) = Self::pick(&ray, ropes)?;
        let start = ropes[key.rope]
            .object(key.node)
            .map(|object| object.position())?;

        self.state = DragState::Dragging(DragSession {
            target: key,
            smoothed: start,
            plane: Plane::new(start, camera.forward()),
        });
        log::info!("drag start: rope {} node {}", key.rope, key.node);
        Some(key)
    }

    /// Advance the drag toward the pointer and push the result into physics.
    ///
    /// Returns the smoothed target that was written, or `None` when idle or
    /// when the pointer ray does not reach the drag plane.
    pub fn on_pointer_move<P: PhysicsEngine + ?Sized>(
        &mut self,
        screen: Vec2,
        viewport: Vec2,
        camera: &Camera,
        ropes: &[Rope],
        physics: &mut P,
    ) -> Option<Vec3> {
        let factor = self.config.smoothing_factor;
        let DragState::Dragging(session) = &mut self.state else {
            return None;
        };

        let ray = camera.screen_to_ray(screen, viewport);
        let raw = ray.at(session.plane.intersect_ray(&ray)?);
        session.smoothed += (raw - session.smoothed) * factor;

        let key = session.target;
        ropes[key.rope].set_node_position(physics, key.node, session.smoothed);
        Some(session.smoothed)
    }

    /// End the drag. Returns the object that was released.
    pub fn on_pointer_up(&mut self) -> Option<ObjectKey> {
        let released = self.target();
        if let Some(key) = released {
            log::info!("drag end: rope {} node {}", key.rope, key.node);
        }
        self.state = DragState::Idle;
        released
    }
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(DragConfig::default())
    }
}
