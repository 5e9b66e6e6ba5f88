//! Boundary to the soft-body simulation.
//!
//! The rope model only ever talks to physics through [`PhysicsEngine`]: it
//! reads node positions by index and, for drag overrides, writes a node's
//! position and velocity. Rendering code never sees engine-native handles.
//!
//! [`VerletWorld`] is a small position-based solver that implements the
//! trait so scenes can run without an external engine.

mod verlet;

pub use verlet::VerletWorld;

use glam::Vec3;

/// Opaque identifier of a rope inside a physics engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RopeHandle(u32);

impl RopeHandle {
    /// Wrap an engine-specific rope id.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// The engine-specific rope id.
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// A particle simulation that owns rope nodes.
///
/// Node indices are stable for the lifetime of a rope. The first and last
/// node of every rope are anchors with inverse mass zero. Index arguments
/// outside `0..node_count(rope)` are programming errors and may panic.
pub trait PhysicsEngine {
    /// Whether the engine finished initializing and may be stepped.
    fn is_ready(&self) -> bool {
        true
    }

    /// Create a rope of `segment_count` segments hanging between two fixed anchors.
    fn create_rope_between(&mut self, start: Vec3, end: Vec3, segment_count: usize) -> RopeHandle;

    /// Spread `mass` evenly over the free nodes of a rope.
    fn set_total_mass(&mut self, rope: RopeHandle, mass: f32);

    fn node_count(&self, rope: RopeHandle) -> usize;

    fn node_position(&self, rope: RopeHandle, index: usize) -> Vec3;

    fn node_velocity(&self, rope: RopeHandle, index: usize) -> Vec3;

    fn node_inverse_mass(&self, rope: RopeHandle, index: usize) -> f32;

    fn set_node_position(&mut self, rope: RopeHandle, index: usize, position: Vec3);

    fn set_node_velocity(&mut self, rope: RopeHandle, index: usize, velocity: Vec3);

    /// Advance the simulation by one fixed step of `dt` seconds.
    fn step(&mut self, dt: f32);
}
