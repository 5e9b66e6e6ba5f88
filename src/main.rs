//! Headless demo: three ropes of clipped-on cards, one of which gets
//! dragged in a circle and released.
//!
//! Run with: `RUST_LOG=debug cargo run --bin clothesline-demo`

use clothesline::prelude::*;
use clothesline::render::RopeView;
use clothesline::time::Time;
use std::time::Duration;

/// Logs a summary of every 60th frame.
struct LogRenderer;

impl RenderSink for LogRenderer {
    fn render(&mut self, frame: &FrameView<'_>) {
        if frame.frame % 60 != 0 {
            return;
        }
        let lowest = frame
            .ropes
            .iter()
            .filter_map(|r: &RopeView<'_>| r.nodes)
            .flat_map(|nodes| nodes.iter().map(|p| p.y))
            .fold(f32::INFINITY, f32::min);
        log::info!(
            "frame {}: {} segments, {} objects, lowest node y = {:.3}",
            frame.frame,
            frame.segment_count(),
            frame.objects.len(),
            lowest
        );
        for object in frame.objects.iter().filter(|o| o.dragged) {
            log::info!("  dragging {:?} at {:?}", object.key, object.pose.position);
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = SceneConfig::new().with_debug_nodes(true);
    let mut frame_loop = FrameLoop::from_scene(
        VerletWorld::new(config.world.clone()),
        LogRenderer,
        &config,
        MeshHandle(0),
        Aabb::from_half_extents(Vec3::new(0.3, 0.4, 0.05)),
    )?;

    // Let the ropes settle.
    for _ in 0..120 {
        frame_loop.tick();
    }

    // Grab the middle card of the middle rope.
    let viewport = frame_loop.viewport();
    let rope = &frame_loop.ropes()[1];
    let node = config.attachment_nodes()[config.objects_per_rope / 2];
    let Some(center) = rope.object(node).map(|o| o.position()) else {
        return Err("middle card missing".into());
    };
    let Some(start) = frame_loop.camera().world_to_screen(center, viewport) else {
        return Err("middle card is behind the camera".into());
    };

    match frame_loop.on_pointer_down(start) {
        Some(key) => log::info!("picked {key:?}"),
        None => log::warn!("nothing under the pointer at {start:?}"),
    }

    for i in 0..240 {
        let angle = i as f32 / 240.0 * std::f32::consts::TAU;
        let offset = Vec2::new(angle.cos() - 1.0, angle.sin()) * 80.0;
        frame_loop.on_pointer_move(start + offset);
        frame_loop.tick();
    }

    frame_loop.on_pointer_up();

    // Let it swing back for a few seconds on the wall clock.
    let mut time = Time::new();
    while time.elapsed() < 3.0 {
        frame_loop.advance(time.update());
        std::thread::sleep(Duration::from_millis(16));
    }

    log::info!(
        "done after {} frames ({} real-time, {:.1} fps)",
        frame_loop.frame(),
        time.frame(),
        time.fps()
    );
    Ok(())
}
