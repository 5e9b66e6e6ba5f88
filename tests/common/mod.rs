//! Recording physics engine shared by the integration tests.

#![allow(dead_code)]

use clothesline::{PhysicsEngine, RopeHandle, Vec3};

/// Every call that mutates node state, in order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Call {
    SetPosition { rope: RopeHandle, index: usize, position: Vec3 },
    SetVelocity { rope: RopeHandle, index: usize, velocity: Vec3 },
    Step(f32),
}

#[derive(Debug, Clone)]
struct MockRope {
    positions: Vec<Vec3>,
    velocities: Vec<Vec3>,
    inverse_masses: Vec<f32>,
}

/// Straight-line ropes that never move on their own.
#[derive(Debug, Clone, Default)]
pub struct RecordingPhysics {
    ropes: Vec<MockRope>,
    pub calls: Vec<Call>,
}

impl RecordingPhysics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move a node without recording the write.
    pub fn place(&mut self, rope: RopeHandle, index: usize, position: Vec3) {
        self.ropes[rope.raw() as usize].positions[index] = position;
    }

    /// Positions written through `set_node_position` for one node.
    pub fn writes_to(&self, rope: RopeHandle, index: usize) -> Vec<Vec3> {
        self.calls
            .iter()
            .filter_map(|call| match *call {
                Call::SetPosition { rope: r, index: i, position } if r == rope && i == index => Some(position),
                _ => None,
            })
            .collect()
    }

    pub fn step_count(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, Call::Step(_))).count()
    }
}

impl PhysicsEngine for RecordingPhysics {
    fn create_rope_between(&mut self, start: Vec3, end: Vec3, segment_count: usize) -> RopeHandle {
        let positions: Vec<Vec3> = (0..=segment_count)
            .map(|i| start.lerp(end, i as f32 / segment_count as f32))
            .collect();
        let inverse_masses = (0..=segment_count)
            .map(|i| if i == 0 || i == segment_count { 0.0 } else { 1.0 })
            .collect();
        self.ropes.push(MockRope {
            velocities: vec![Vec3::ZERO; positions.len()],
            positions,
            inverse_masses,
        });
        RopeHandle::from_raw(self.ropes.len() as u32 - 1)
    }

    fn set_total_mass(&mut self, _rope: RopeHandle, _mass: f32) {}

    fn node_count(&self, rope: RopeHandle) -> usize {
        self.ropes[rope.raw() as usize].positions.len()
    }

    fn node_position(&self, rope: RopeHandle, index: usize) -> Vec3 {
        self.ropes[rope.raw() as usize].positions[index]
    }

    fn node_velocity(&self, rope: RopeHandle, index: usize) -> Vec3 {
        self.ropes[rope.raw() as usize].velocities[index]
    }

    fn node_inverse_mass(&self, rope: RopeHandle, index: usize) -> f32 {
        self.ropes[rope.raw() as usize].inverse_masses[index]
    }

    fn set_node_position(&mut self, rope: RopeHandle, index: usize, position: Vec3) {
        self.ropes[rope.raw() as usize].positions[index] = position;
        self.calls.push(Call::SetPosition { rope, index, position });
    }

    fn set_node_velocity(&mut self, rope: RopeHandle, index: usize, velocity: Vec3) {
        self.ropes[rope.raw() as usize].velocities[index] = velocity;
        self.calls.push(Call::SetVelocity { rope, index, velocity });
    }

    fn step(&mut self, dt: f32) {
        self.calls.push(Call::Step(dt));
    }
}
