//! Frame loop: step physics, synchronize ropes, orient objects, render.
//!
//! Drag overrides arrive through pointer events between frames and are
//! written straight into physics, so the next step always integrates
//! against them.

use glam::{Vec2, Vec3};
use winit::event::WindowEvent;

use crate::attachment::AttachedObject;
use crate::camera::Camera;
use crate::config::{OrientationConfig, SceneConfig};
use crate::error::{Result, SceneError};
use crate::geometry::Aabb;
use crate::input::{Pointer, PointerEvent};
use crate::interaction::InteractionController;
use crate::physics::PhysicsEngine;
use crate::render::{FrameView, MeshHandle, ObjectView, RenderSink, RopeView};
use crate::rope::{ObjectKey, Rope};
use crate::time::FixedTimestep;

/// Owns a scene and drives it one frame at a time.
pub struct FrameLoop<P: PhysicsEngine, R: RenderSink> {
    physics: P,
    renderer: R,
    ropes: Vec<Rope>,
    camera: Camera,
    pointer: Pointer,
    controller: InteractionController,
    orientation: OrientationConfig,
    timestep: FixedTimestep,
    debug_nodes: bool,
    frame: u64,
}

impl<P: PhysicsEngine, R: RenderSink> FrameLoop<P, R> {
    /// Wrap already-built ropes. Fails if physics is not ready.
    pub fn new(physics: P, renderer: R, ropes: Vec<Rope>, config: &SceneConfig) -> Result<Self> {
        if !physics.is_ready() {
            return Err(SceneError::PhysicsNotReady);
        }
        config.world.validate()?;
        config.orientation.validate()?;
        config.drag.validate()?;

        let mut frame_loop = Self {
            physics,
            renderer,
            ropes,
            camera: Camera::new(),
            pointer: Pointer::new(),
            controller: InteractionController::new(config.drag),
            orientation: config.orientation.clone(),
            timestep: FixedTimestep::new(config.world.fixed_delta, config.world.max_sub_steps),
            debug_nodes: config.debug_nodes,
            frame: 0,
        };
        frame_loop.synchronize();
        Ok(frame_loop)
    }

    /// Build the scene described by `config`: one rope per height, each with
    /// `objects_per_rope` copies of `mesh` at evenly spaced nodes.
    pub fn from_scene(mut physics: P, renderer: R, config: &SceneConfig, mesh: MeshHandle, bounds: Aabb) -> Result<Self> {
        config.validate()?;
        if !physics.is_ready() {
            return Err(SceneError::PhysicsNotReady);
        }

        let mut ropes = Vec::with_capacity(config.rope_heights.len());
        for &height in &config.rope_heights {
            let mut rope = Rope::new(&mut physics, &config.rope_at(height))?;
            for node in config.attachment_nodes() {
                let object = AttachedObject::new(mesh, bounds).with_scale(config.object_scale);
                rope.attach(object, node)?;
            }
            ropes.push(rope);
        }
        log::info!(
            "scene ready: {} ropes, {} objects",
            ropes.len(),
            ropes.iter().map(Rope::attachment_count).sum::<usize>()
        );

        Self::new(physics, renderer, ropes, config)
    }

    /// Run exactly one fixed physics step, then present.
    pub fn tick(&mut self) {
        self.step_physics(1);
        self.present();
    }

    /// Run as many fixed steps as `delta` seconds cover (capped), then
    /// present. Returns the number of steps taken.
    pub fn advance(&mut self, delta: f32) -> u32 {
        let steps = self.timestep.accumulate(delta);
        self.step_physics(steps);
        self.present();
        steps
    }

    fn step_physics(&mut self, steps: u32) {
        assert!(
            self.physics.is_ready(),
            "physics engine stopped reporting ready while the frame loop was running"
        );
        let dt = self.timestep.step();
        for _ in 0..steps {
            self.physics.step(dt);
        }
    }

    fn synchronize(&mut self) {
        for rope in self.ropes.iter_mut() {
            rope.synchronize(&self.physics);
        }
        for rope in self.ropes.iter_mut() {
            rope.update_orientations(&self.physics, &self.orientation);
        }
    }

    fn present(&mut self) {
        self.synchronize();
        self.frame += 1;

        let dragged = self.controller.target();
        let ropes = self
            .ropes
            .iter()
            .enumerate()
            .map(|(index, rope)| RopeView {
                rope: index,
                segments: rope.instances(),
                nodes: self.debug_nodes.then(|| rope.node_positions()),
            })
            .collect();
        let objects = self
            .ropes
            .iter()
            .enumerate()
            .flat_map(|(rope_index, rope)| {
                rope.objects().map(move |(node, object)| {
                    let key = ObjectKey { rope: rope_index, node };
                    ObjectView {
                        key,
                        mesh: object.mesh(),
                        pose: *object.pose(),
                        dragged: dragged == Some(key),
                    }
                })
            })
            .collect();

        let view = FrameView {
            frame: self.frame,
            camera: &self.camera,
            ropes,
            objects,
        };
        self.renderer.render(&view);
    }

    pub fn on_pointer_down(&mut self, screen: Vec2) -> Option<ObjectKey> {
        let viewport = self.pointer.viewport();
        self.controller
            .on_pointer_down(screen, viewport, &self.camera, &self.ropes)
    }

    pub fn on_pointer_move(&mut self, screen: Vec2) -> Option<Vec3> {
        let viewport = self.pointer.viewport();
        self.controller
            .on_pointer_move(screen, viewport, &self.camera, &self.ropes, &mut self.physics)
    }

    pub fn on_pointer_up(&mut self) -> Option<ObjectKey> {
        self.controller.on_pointer_up()
    }

    /// Feed a winit window event through the pointer tracker.
    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        match self.pointer.handle_event(event) {
            Some(PointerEvent::Down(screen)) => {
                self.on_pointer_down(screen);
            }
            Some(PointerEvent::Move(screen)) => {
                self.on_pointer_move(screen);
            }
            Some(PointerEvent::Up(_)) => {
                self.on_pointer_up();
            }
            None => {}
        }
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.pointer.set_window_size(width, height);
    }

    pub fn viewport(&self) -> Vec2 {
        self.pointer.viewport()
    }

    pub fn physics(&self) -> &P {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut P {
        &mut self.physics
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn ropes(&self) -> &[Rope] {
        &self.ropes
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    /// Frames presented so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }
}
