//! Frame timing: a wall clock for measuring frames and a fixed-step
//! accumulator that turns variable frame times into whole physics steps.
//!
//! # Example
//!
//! ```ignore
//! use clothesline::time::{FixedTimestep, Time};
//!
//! let mut time = Time::new();
//! let mut timestep = FixedTimestep::new(1.0 / 60.0, 10);
//!
//! // In your frame callback:
//! let delta = time.update();
//! for _ in 0..timestep.accumulate(delta) {
//!     physics.step(timestep.step());
//! }
//! ```

use std::time::{Duration, Instant};

/// Wall-clock frame timing.
#[derive(Debug)]
pub struct Time {
    /// When the timer was created.
    start: Instant,
    /// When the last frame occurred.
    last_frame: Instant,
    /// Time since last frame in seconds.
    delta_secs: f32,
    /// Total frames since start.
    frame_count: u64,
    /// Calculated FPS (updated periodically).
    fps: f32,
    /// Frame count at last FPS update.
    fps_frame_count: u64,
    /// Time of last FPS calculation.
    fps_update_time: Instant,
    fps_update_interval: Duration,
}

impl Time {
    /// Create a new time tracker starting from now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_frame: now,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
        }
    }

    /// Mark the start of a new frame. Returns the time since the previous one.
    pub fn update(&mut self) -> f32 {
        let now = Instant::now();
        self.delta_secs = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.frame_count += 1;

        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        self.delta_secs
    }

    /// Total elapsed time in seconds since start.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }

    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

/// Accumulates frame time and releases it as whole fixed steps.
///
/// At most `max_sub_steps` steps are released per frame; time beyond that
/// is dropped so a long stall does not trigger a burst of catch-up steps.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedTimestep {
    step: f32,
    max_sub_steps: u32,
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(step: f32, max_sub_steps: u32) -> Self {
        Self {
            step,
            max_sub_steps: max_sub_steps.max(1),
            accumulator: 0.0,
        }
    }

    /// Length of one step in seconds.
    #[inline]
    pub fn step(&self) -> f32 {
        self.step
    }

    #[inline]
    pub fn max_sub_steps(&self) -> u32 {
        self.max_sub_steps
    }

    /// Time carried over to the next frame.
    #[inline]
    pub fn remainder(&self) -> f32 {
        self.accumulator
    }

    /// Add `delta` seconds and return how many steps to run now.
    pub fn accumulate(&mut self, delta: f32) -> u32 {
        if self.step.is_nan() || self.step <= 0.0 || !delta.is_finite() || delta <= 0.0 {
            return 0;
        }
        self.accumulator += delta;

        let available = (self.accumulator / self.step).floor() as u32;
        let steps = available.min(self.max_sub_steps);
        if available > steps {
            log::warn!(
                "frame took {:.3}s; running {} of {} steps and dropping the rest",
                delta,
                steps,
                available
            );
            self.accumulator = 0.0;
        } else {
            self.accumulator -= steps as f32 * self.step;
        }
        steps
    }

    /// Drop any accumulated time.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
