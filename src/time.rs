//! Frame clock for the animation.
//!
//! The wind phase advances by a fixed step per presented frame rather than
//! by wall time, so the flow has one speed everywhere and slow frames
//! stretch the motion instead of skipping it. Wall time is only consulted
//! for the FPS estimate.
//!
//! # Example
//!
//! ```ignore
//! use windglobe::time::Clock;
//!
//! let mut clock = Clock::default();
//!
//! // In your render loop:
//! let time = clock.tick();
//! println!("t = {time:.3}s over {} frames at {:.1} FPS", clock.frame(), clock.fps());
//! ```

use std::time::{Duration, Instant};

/// Seconds of animation time added per frame.
pub const DEFAULT_STEP: f32 = 0.016;

/// Fixed-step animation clock with an FPS estimate on the side.
#[derive(Debug)]
pub struct Clock {
    /// Animation seconds added per `tick`.
    step: f32,
    /// Accumulated animation time in seconds.
    time: f32,
    /// Total frames since start.
    frame_count: u64,
    /// Calculated FPS (updated periodically).
    fps: f32,
    /// Frame count at last FPS update.
    fps_frame_count: u64,
    /// Wall time of last FPS calculation.
    fps_update_time: Instant,
    /// How often to refresh the FPS estimate.
    fps_update_interval: Duration,
    /// Whether animation time is frozen.
    paused: bool,
}

impl Clock {
    /// Create a clock advancing `step` animation seconds per frame.
    pub fn new(step: f32) -> Self {
        Self {
            step,
            time: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: Instant::now(),
            fps_update_interval: Duration::from_millis(500),
            paused: false,
        }
    }

    /// Advance by one frame and return the animation time.
    ///
    /// While paused the time holds still but frames keep counting, so the
    /// FPS estimate stays live.
    pub fn tick(&mut self) -> f32 {
        if !self.paused {
            self.time += self.step;
        }
        self.frame_count += 1;

        let now = Instant::now();
        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        self.time
    }

    /// Current animation time in seconds.
    #[inline]
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Animation seconds added per frame.
    #[inline]
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Total frames since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Calculated frames per second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Whether animation time is currently frozen.
    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Freeze animation time.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume animation time.
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Toggle between frozen and running.
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Reset to time zero, unpaused.
    pub fn reset(&mut self) {
        self.time = 0.0;
        self.frame_count = 0;
        self.fps = 0.0;
        self.fps_frame_count = 0;
        self.fps_update_time = Instant::now();
        self.paused = false;
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(DEFAULT_STEP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_new() {
        let clock = Clock::default();
        assert_eq!(clock.frame(), 0);
        assert_eq!(clock.time(), 0.0);
        assert_eq!(clock.step(), DEFAULT_STEP);
        assert!(!clock.is_paused());
    }

    #[test]
    fn test_fixed_accumulation() {
        let mut clock = Clock::new(0.016);
        clock.tick();
        clock.tick();
        let t = clock.tick();
        assert!((t - 0.048).abs() < 1e-6);
        assert_eq!(clock.frame(), 3);
    }

    #[test]
    fn test_pause_freezes_time_not_frames() {
        let mut clock = Clock::default();
        clock.tick();
        let frozen = clock.time();

        clock.pause();
        clock.tick();
        clock.tick();
        assert_eq!(clock.time(), frozen);
        assert_eq!(clock.frame(), 3);

        clock.toggle_pause();
        clock.tick();
        assert!(clock.time() > frozen);
    }

    #[test]
    fn test_reset() {
        let mut clock = Clock::default();
        clock.tick();
        clock.pause();
        clock.reset();
        assert_eq!(clock.time(), 0.0);
        assert_eq!(clock.frame(), 0);
        assert!(!clock.is_paused());
    }
}
