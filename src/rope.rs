//! Rope model: node indices, attachments and per-frame synchronization.
//!
//! A [`Rope`] mirrors one rope living in a [`PhysicsEngine`]. It owns the
//! ordered node indices, the rest length of a segment and the attachment map
//! (at most one [`AttachedObject`] per node). Physics stays the single source
//! of truth for node positions; [`Rope::set_node_position`] is the only path
//! that writes back into it.
//!
//! # Frame order
//!
//! ```ignore
//! physics.step(dt);
//! rope.synchronize(&physics);
//! rope.update_orientations(&physics, &orientation);
//! renderer.render(...);
//! ```

use std::collections::BTreeMap;

use glam::Vec3;

use crate::attachment::AttachedObject;
use crate::config::{OrientationConfig, RopeConfig};
use crate::error::{AttachError, Result, SceneError};
use crate::geometry::SegmentTransform;
use crate::physics::{PhysicsEngine, RopeHandle};
use crate::render::SegmentInstance;

/// Identifies an attached object across all ropes of a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectKey {
    /// Index of the rope in its scene.
    pub rope: usize,
    /// Node the object is bound to.
    pub node: usize,
}

/// Render-side view of one simulated rope.
#[derive(Debug, Clone)]
pub struct Rope {
    handle: RopeHandle,
    /// Node indices in order along the rope, anchors first and last.
    nodes: Vec<usize>,
    reference_segment_length: f32,
    attachments: BTreeMap<usize, AttachedObject>,
    segments: Vec<SegmentTransform>,
    instances: Vec<SegmentInstance>,
    node_positions: Vec<Vec3>,
}

impl Rope {
    /// Create the rope in `physics` and wrap it.
    pub fn new<P: PhysicsEngine + ?Sized>(physics: &mut P, config: &RopeConfig) -> Result<Self> {
        config.validate()?;
        if !physics.is_ready() {
            return Err(SceneError::PhysicsNotReady);
        }
        let span = config.anchor_distance();
        if config.rope_length < span {
            log::warn!(
                "rope_length {:.3} is shorter than the anchor distance {:.3}; the rope will render stretched at rest",
                config.rope_length,
                span
            );
        }
        let handle = physics.create_rope_between(config.start, config.end, config.segment_count);
        physics.set_total_mass(handle, config.total_mass);
        Self::from_handle(physics, handle, config)
    }

    /// Wrap a rope that already exists in `physics`.
    pub fn from_handle<P: PhysicsEngine + ?Sized>(
        physics: &P,
        handle: RopeHandle,
        config: &RopeConfig,
    ) -> Result<Self> {
        config.validate()?;
        let expected = config.node_count();
        let actual = physics.node_count(handle);
        if actual != expected {
            return Err(SceneError::NodeCountMismatch { expected, actual });
        }

        let segment_count = config.segment_count;
        let reference_segment_length = config.reference_segment_length();
        log::debug!(
            "rope {}: {} nodes, reference segment length {:.4}",
            handle.raw(),
            expected,
            reference_segment_length
        );

        Ok(Self {
            handle,
            nodes: (0..expected).collect(),
            reference_segment_length,
            attachments: BTreeMap::new(),
            segments: vec![SegmentTransform::default(); segment_count],
            instances: vec![SegmentInstance::from(&SegmentTransform::default()); segment_count],
            node_positions: vec![Vec3::ZERO; expected],
        })
    }

    pub fn handle(&self) -> RopeHandle {
        self.handle
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn segment_count(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Index of the last node (the second anchor).
    pub fn last_index(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_anchor(&self, index: usize) -> bool {
        index == 0 || index == self.last_index()
    }

    pub fn reference_segment_length(&self) -> f32 {
        self.reference_segment_length
    }

    /// Bind `object` to `node_index`.
    ///
    /// Anchors, indices past the end and already occupied nodes are rejected.
    /// The object is not moved; its position is set by the next
    /// [`synchronize`](Self::synchronize).
    pub fn attach(&mut self, mut object: AttachedObject, node_index: usize) -> std::result::Result<(), AttachError> {
        let node_count = self.node_count();
        if node_index >= node_count {
            return Err(AttachError::OutOfRange { index: node_index, node_count });
        }
        if self.is_anchor(node_index) {
            return Err(AttachError::AnchorNode { index: node_index });
        }
        if self.attachments.contains_key(&node_index) {
            return Err(AttachError::Occupied { index: node_index });
        }

        object.bind(node_index);
        self.attachments.insert(node_index, object);
        log::debug!("rope {}: attached object at node {}", self.handle.raw(), node_index);
        Ok(())
    }

    /// Overwrite a node's simulated position and zero its velocity.
    ///
    /// # Panics
    ///
    /// Panics if `node_index` is not a node of this rope, or is an anchor.
    pub fn set_node_position<P: PhysicsEngine + ?Sized>(&self, physics: &mut P, node_index: usize, position: Vec3) {
        assert!(
            node_index < self.node_count(),
            "node index {} out of range for rope {} ({} nodes)",
            node_index,
            self.handle.raw(),
            self.node_count()
        );
        assert!(
            !self.is_anchor(node_index),
            "node {} of rope {} is an anchor and cannot be moved",
            node_index,
            self.handle.raw()
        );
        let node = self.nodes[node_index];
        physics.set_node_position(self.handle, node, position);
        physics.set_node_velocity(self.handle, node, Vec3::ZERO);
    }

    /// Current simulated position of a node.
    pub fn node_position<P: PhysicsEngine + ?Sized>(&self, physics: &P, node_index: usize) -> Vec3 {
        physics.node_position(self.handle, self.nodes[node_index])
    }

    /// Copy simulation state into attached objects and segment transforms.
    ///
    /// Visits every node and every segment; nothing is cached between frames.
    pub fn synchronize<P: PhysicsEngine + ?Sized>(&mut self, physics: &P) {
        for (slot, &node) in self.node_positions.iter_mut().zip(self.nodes.iter()) {
            *slot = physics.node_position(self.handle, node);
        }

        for (&index, object) in self.attachments.iter_mut() {
            object.update_position(self.node_positions[index]);
        }

        let reference = self.reference_segment_length;
        for (i, pair) in self.node_positions.windows(2).enumerate() {
            let transform = SegmentTransform::between(pair[0], pair[1], reference);
            self.instances[i] = SegmentInstance::from(&transform);
            self.segments[i] = transform;
        }
    }

    /// Re-derive every attached object's orientation from its node and the
    /// node before it. Objects whose local direction is degenerate keep their
    /// previous orientation.
    pub fn update_orientations<P: PhysicsEngine + ?Sized>(&mut self, physics: &P, config: &OrientationConfig) {
        for (&index, object) in self.attachments.iter_mut() {
            let current = physics.node_position(self.handle, self.nodes[index]);
            let previous = physics.node_position(self.handle, self.nodes[index - 1]);
            object.update_orientation(current, previous, config);
        }
    }

    /// Segment transforms from the last synchronization.
    pub fn segments(&self) -> &[SegmentTransform] {
        &self.segments
    }

    /// Instance buffer matching [`segments`](Self::segments).
    pub fn instances(&self) -> &[SegmentInstance] {
        &self.instances
    }

    /// Node positions read during the last synchronization.
    pub fn node_positions(&self) -> &[Vec3] {
        &self.node_positions
    }

    pub fn object(&self, node_index: usize) -> Option<&AttachedObject> {
        self.attachments.get(&node_index)
    }

    pub fn object_mut(&mut self, node_index: usize) -> Option<&mut AttachedObject> {
        self.attachments.get_mut(&node_index)
    }

    /// Attached objects in ascending node order.
    pub fn objects(&self) -> impl Iterator<Item = (usize, &AttachedObject)> {
        self.attachments.iter().map(|(&index, object)| (index, object))
    }

    pub fn attachment_count(&self) -> usize {
        self.attachments.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Aabb;
    use crate::physics::VerletWorld;
    use crate::render::MeshHandle;

    fn object() -> AttachedObject {
        AttachedObject::new(MeshHandle(0), Aabb::from_half_extents(Vec3::splat(0.25)))
    }

    fn rope(segments: usize) -> (VerletWorld, Rope) {
        let mut world = VerletWorld::default();
        let config = RopeConfig::new().with_segment_count(segments);
        let rope = Rope::new(&mut world, &config).unwrap();
        (world, rope)
    }

    #[test]
    fn test_new_rope_shape() {
        let (_world, rope) = rope(20);
        assert_eq!(rope.node_count(), 21);
        assert_eq!(rope.segment_count(), 20);
        assert!((rope.reference_segment_length() - 0.3).abs() < 1e-6);
        assert!(rope.is_anchor(0));
        assert!(rope.is_anchor(20));
        assert!(!rope.is_anchor(10));
    }

    #[test]
    fn test_attach_rejects_anchors_and_out_of_range() {
        let (_world, mut rope) = rope(10);
        assert_eq!(rope.attach(object(), 0), Err(AttachError::AnchorNode { index: 0 }));
        assert_eq!(rope.attach(object(), 10), Err(AttachError::AnchorNode { index: 10 }));
        assert_eq!(
            rope.attach(object(), 11),
            Err(AttachError::OutOfRange { index: 11, node_count: 11 })
        );
        assert_eq!(rope.attachment_count(), 0);
    }

    #[test]
    fn test_one_object_per_node() {
        let (_world, mut rope) = rope(10);
        rope.attach(object(), 5).unwrap();
        assert_eq!(rope.attach(object(), 5), Err(AttachError::Occupied { index: 5 }));
        assert_eq!(rope.attachment_count(), 1);
        assert_eq!(rope.object(5).unwrap().node_index(), Some(5));
    }

    #[test]
    fn test_attach_does_not_move_object() {
        let (_world, mut rope) = rope(10);
        let start = Vec3::new(9.0, 9.0, 9.0);
        rope.attach(object().with_position(start), 3).unwrap();
        assert_eq!(rope.object(3).unwrap().position(), start);
    }

    #[test]
    fn test_synchronize_copies_node_position() {
        let (mut world, mut rope) = rope(10);
        rope.attach(object(), 4).unwrap();
        world.step(1.0 / 60.0);
        rope.synchronize(&world);
        let expected = world.node_position(rope.handle(), 4);
        assert_eq!(rope.object(4).unwrap().position(), expected);
        assert_eq!(rope.node_positions()[4], expected);
    }

    #[test]
    fn test_synchronize_visits_every_segment() {
        let (world, mut rope) = rope(12);
        rope.synchronize(&world);
        assert_eq!(rope.segments().len(), 12);
        assert_eq!(rope.instances().len(), 12);
        // Straight rope at rest: every segment at its reference length.
        for segment in rope.segments() {
            assert!((segment.stretch() - 1.0).abs() < 1e-5);
            assert!((segment.rotation * Vec3::Y).abs_diff_eq(Vec3::X, 1e-5));
        }
    }

    #[test]
    fn test_set_node_position_zeroes_velocity() {
        let (mut world, rope) = rope(10);
        for _ in 0..10 {
            world.step(1.0 / 60.0);
        }
        assert_ne!(world.node_velocity(rope.handle(), 6), Vec3::ZERO);
        let p = Vec3::new(0.3, -2.0, 1.0);
        rope.set_node_position(&mut world, 6, p);
        assert_eq!(world.node_position(rope.handle(), 6), p);
        assert_eq!(world.node_velocity(rope.handle(), 6), Vec3::ZERO);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_set_node_position_out_of_range_panics() {
        let (mut world, rope) = rope(10);
        rope.set_node_position(&mut world, 11, Vec3::ZERO);
    }

    #[test]
    #[should_panic(expected = "is an anchor")]
    fn test_set_node_position_on_anchor_panics() {
        let (mut world, rope) = rope(10);
        rope.set_node_position(&mut world, 0, Vec3::new(0.0, -5.0, 0.0));
    }

    #[test]
    fn test_anchor_untouched_when_override_rejected() {
        let (mut world, rope) = rope(10);
        let anchor = world.node_position(rope.handle(), 10);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            rope.set_node_position(&mut world, 10, Vec3::new(0.0, -5.0, 0.0));
        }));
        assert!(result.is_err());
        assert_eq!(world.node_position(rope.handle(), 10), anchor);
    }

    #[test]
    fn test_rope_length_sets_reference_not_rest() {
        let mut world = VerletWorld::default();
        let config = RopeConfig::new()
            .with_anchors(Vec3::new(-3.0, 0.0, 0.0), Vec3::new(3.0, 0.0, 0.0))
            .with_rope_length(8.0)
            .with_segment_count(10);
        assert!((config.anchor_distance() - 6.0).abs() < 1e-6);
        let mut rope = Rope::new(&mut world, &config).unwrap();
        rope.synchronize(&world);
        // Physics rest length follows the anchors, so the segments show as compressed.
        assert!((rope.segments()[4].stretch() - 0.75).abs() < 1e-5);
    }

    #[test]
    fn test_node_count_mismatch() {
        let mut world = VerletWorld::default();
        let handle = world.create_rope_between(Vec3::ZERO, Vec3::X, 5);
        let err = Rope::from_handle(&world, handle, &RopeConfig::new().with_segment_count(8)).unwrap_err();
        assert_eq!(err, SceneError::NodeCountMismatch { expected: 9, actual: 6 });
    }

    #[test]
    fn test_objects_in_node_order() {
        let (_world, mut rope) = rope(10);
        rope.attach(object(), 7).unwrap();
        rope.attach(object(), 2).unwrap();
        rope.attach(object(), 5).unwrap();
        let order: Vec<usize> = rope.objects().map(|(i, _)| i).collect();
        assert_eq!(order, vec![2, 5, 7]);
    }
}
