//! Frame clock.
//!
//! Measures wall-clock delta between frames for the tween driver and keeps a
//! smoothed FPS figure for the window title.
//!
//! ```ignore
//! let mut clock = Time::new();
//! // once per frame:
//! let dt = clock.update();
//! tween.advance(dt);
//! ```

use std::time::{Duration, Instant};

/// Per-frame timing.
#[derive(Debug)]
pub struct Time {
    last_frame: Instant,
    delta_secs: f32,
    elapsed_secs: f32,
    frame_count: u64,
    fps: f32,
    fps_frame_count: u64,
    fps_update_time: Instant,
    fps_update_interval: Duration,
    paused: bool,
    /// Upper bound on a single delta, so a stalled frame does not jump the tween.
    max_delta: f32,
}

impl Time {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            last_frame: now,
            delta_secs: 0.0,
            elapsed_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
            paused: false,
            max_delta: 0.25,
        }
    }

    /// Advance one frame. Returns the delta in seconds (0 while paused).
    pub fn update(&mut self) -> f32 {
        let now = Instant::now();
        let raw = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.tick(raw);

        let since = now.duration_since(self.fps_update_time);
        if since >= self.fps_update_interval {
            let frames = self.frame_count - self.fps_frame_count;
            self.fps = frames as f32 / since.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        self.delta_secs
    }

    /// Advance by an explicit delta.
    pub(crate) fn tick(&mut self, raw_delta: f32) {
        self.delta_secs = if self.paused {
            0.0
        } else {
            raw_delta.clamp(0.0, self.max_delta)
        };
        self.elapsed_secs += self.delta_secs;
        self.frame_count += 1;
    }

    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Unpaused time accumulated so far.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn set_max_delta(&mut self, max_delta: f32) {
        self.max_delta = max_delta.max(0.0);
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_time_new() {
        let time = Time::new();
        assert_eq!(time.frame(), 0);
        assert_eq!(time.elapsed(), 0.0);
        assert!(!time.is_paused());
    }

    #[test]
    fn test_time_update() {
        let mut time = Time::new();
        thread::sleep(Duration::from_millis(10));
        let delta = time.update();
        assert!(delta > 0.0);
        assert_eq!(time.frame(), 1);
    }

    #[test]
    fn test_paused_delta_is_zero() {
        let mut time = Time::new();
        time.set_paused(true);
        time.tick(0.1);
        assert_eq!(time.delta(), 0.0);
        assert_eq!(time.elapsed(), 0.0);
        assert_eq!(time.frame(), 1);
    }

    #[test]
    fn test_delta_capped() {
        let mut time = Time::new();
        time.tick(5.0);
        assert_eq!(time.delta(), 0.25);
        time.tick(-1.0);
        assert_eq!(time.delta(), 0.0);
    }
}
