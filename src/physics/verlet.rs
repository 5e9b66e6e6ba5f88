//! Position-based rope solver.
//!
//! Each step integrates velocities under gravity, relaxes the segment
//! distance constraints on predicted positions, then derives the new
//! velocities from the positional change.

use glam::Vec3;

use super::{PhysicsEngine, RopeHandle};
use crate::config::WorldConfig;

#[derive(Debug, Clone)]
struct Node {
    position: Vec3,
    velocity: Vec3,
    inverse_mass: f32,
}

#[derive(Debug, Clone)]
struct RopeBody {
    nodes: Vec<Node>,
    rest_lengths: Vec<f32>,
    predicted: Vec<Vec3>,
}

impl RopeBody {
    fn between(start: Vec3, end: Vec3, segment_count: usize) -> Self {
        let segment_count = segment_count.max(1);
        let nodes: Vec<Node> = (0..=segment_count)
            .map(|i| {
                let t = i as f32 / segment_count as f32;
                let anchor = i == 0 || i == segment_count;
                Node {
                    position: start.lerp(end, t),
                    velocity: Vec3::ZERO,
                    inverse_mass: if anchor { 0.0 } else { 1.0 },
                }
            })
            .collect();

        let rest_lengths = nodes
            .windows(2)
            .map(|pair| pair[0].position.distance(pair[1].position))
            .collect();

        let predicted = nodes.iter().map(|n| n.position).collect();

        Self {
            nodes,
            rest_lengths,
            predicted,
        }
    }

    fn step(&mut self, dt: f32, config: &WorldConfig) {
        for (node, predicted) in self.nodes.iter_mut().zip(self.predicted.iter_mut()) {
            if node.inverse_mass > 0.0 {
                node.velocity += config.gravity * dt;
                *predicted = node.position + node.velocity * dt;
            } else {
                *predicted = node.position;
            }
        }

        for _ in 0..config.iterations {
            for i in 0..self.rest_lengths.len() {
                let rest = self.rest_lengths[i];
                self.solve_distance(i, i + 1, rest);
            }
        }

        let inv_dt = 1.0 / dt;
        for (node, predicted) in self.nodes.iter_mut().zip(self.predicted.iter()) {
            if node.inverse_mass > 0.0 {
                node.velocity = (*predicted - node.position) * inv_dt * config.damping;
                node.position = *predicted;
            }
        }
    }

    fn solve_distance(&mut self, a: usize, b: usize, rest: f32) {
        let w_a = self.nodes[a].inverse_mass;
        let w_b = self.nodes[b].inverse_mass;
        let w_sum = w_a + w_b;
        if w_sum <= 0.0 {
            return;
        }

        let delta = self.predicted[b] - self.predicted[a];
        let length = delta.length();
        if length <= f32::EPSILON {
            return;
        }

        let correction = delta * ((length - rest) / (length * w_sum));
        self.predicted[a] += correction * w_a;
        self.predicted[b] -= correction * w_b;
    }
}

/// In-process rope simulation implementing [`PhysicsEngine`].
#[derive(Debug, Clone)]
pub struct VerletWorld {
    config: WorldConfig,
    ropes: Vec<RopeBody>,
}

impl VerletWorld {
    pub fn new(config: WorldConfig) -> Self {
        Self {
            config,
            ropes: Vec::new(),
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Number of ropes created so far.
    pub fn rope_count(&self) -> usize {
        self.ropes.len()
    }

    fn rope(&self, rope: RopeHandle) -> &RopeBody {
        &self.ropes[rope.raw() as usize]
    }

    fn rope_mut(&mut self, rope: RopeHandle) -> &mut RopeBody {
        &mut self.ropes[rope.raw() as usize]
    }
}

impl Default for VerletWorld {
    fn default() -> Self {
        Self::new(WorldConfig::default())
    }
}

impl PhysicsEngine for VerletWorld {
    fn create_rope_between(&mut self, start: Vec3, end: Vec3, segment_count: usize) -> RopeHandle {
        let handle = RopeHandle::from_raw(self.ropes.len() as u32);
        self.ropes.push(RopeBody::between(start, end, segment_count));
        log::debug!(
            "verlet: created rope {} with {} segments",
            handle.raw(),
            segment_count
        );
        handle
    }

    fn set_total_mass(&mut self, rope: RopeHandle, mass: f32) {
        let body = self.rope_mut(rope);
        let free = body.nodes.iter().filter(|n| n.inverse_mass > 0.0).count();
        if free == 0 || mass <= 0.0 {
            return;
        }
        let inverse_mass = free as f32 / mass;
        for node in body.nodes.iter_mut().filter(|n| n.inverse_mass > 0.0) {
            node.inverse_mass = inverse_mass;
        }
    }

    fn node_count(&self, rope: RopeHandle) -> usize {
        self.rope(rope).nodes.len()
    }

    fn node_position(&self, rope: RopeHandle, index: usize) -> Vec3 {
        self.rope(rope).nodes[index].position
    }

    fn node_velocity(&self, rope: RopeHandle, index: usize) -> Vec3 {
        self.rope(rope).nodes[index].velocity
    }

    fn node_inverse_mass(&self, rope: RopeHandle, index: usize) -> f32 {
        self.rope(rope).nodes[index].inverse_mass
    }

    fn set_node_position(&mut self, rope: RopeHandle, index: usize, position: Vec3) {
        self.rope_mut(rope).nodes[index].position = position;
    }

    fn set_node_velocity(&mut self, rope: RopeHandle, index: usize, velocity: Vec3) {
        self.rope_mut(rope).nodes[index].velocity = velocity;
    }

    fn step(&mut self, dt: f32) {
        // Also rejects NaN.
        if !(dt > 0.0 && dt.is_finite()) {
            log::warn!("ignoring physics step with dt = {}", dt);
            return;
        }
        let config = &self.config;
        for rope in self.ropes.iter_mut() {
            rope.step(dt, config);
        }
    }
}
