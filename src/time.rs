//! Frame clock for the animation loop.
//!
//! Counts frames and measures the achieved refresh rate. The simulation
//! itself does not use elapsed time: one frame advances it by one tick.

use std::time::{Duration, Instant};

/// Frame counting and FPS measurement.
#[derive(Debug)]
pub struct Time {
    /// When the clock was created or last reset.
    start: Instant,
    /// Total frames since start.
    frame_count: u64,
    /// Calculated FPS (updated periodically).
    fps: f32,
    /// Frame count at last FPS update.
    fps_frame_count: u64,
    /// Time of last FPS calculation.
    fps_update_time: Instant,
    /// How often to update FPS calculation.
    fps_update_interval: Duration,
}

impl Time {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
        }
    }

    /// Record one frame. Returns the new FPS reading when one was computed.
    pub fn update(&mut self) -> Option<f32> {
        let now = Instant::now();
        self.frame_count += 1;

        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed < self.fps_update_interval {
            return None;
        }
        let frames_since = self.frame_count - self.fps_frame_count;
        self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
        self.fps_frame_count = self.frame_count;
        self.fps_update_time = now;
        Some(self.fps)
    }

    /// Total frames since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Last computed frames per second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Wall time since start.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Reset the clock. FPS measurement restarts from now.
    pub fn reset(&mut self) {
        *self = Self {
            fps_update_interval: self.fps_update_interval,
            ..Self::new()
        };
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}
