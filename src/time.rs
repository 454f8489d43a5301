//! Wall clock driving the scene.
//!
//! [`Scene::step`](crate::Scene::step) takes absolute seconds since start, so
//! the clock hands out elapsed time rather than deltas. It also keeps a
//! once-a-second frame rate sample for the log.

use std::time::{Duration, Instant};

const FPS_WINDOW: Duration = Duration::from_secs(1);

/// Scene time plus a rolling FPS sample.
#[derive(Debug, Clone)]
pub struct SceneClock {
    start: Instant,
    frames: u64,
    window_start: Instant,
    window_frames: u32,
    sample: Option<f32>,
}

impl SceneClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    fn starting_at(start: Instant) -> Self {
        Self {
            start,
            frames: 0,
            window_start: start,
            window_frames: 0,
            sample: None,
        }
    }

    /// Count a frame and return seconds since start.
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> f32 {
        self.frames += 1;
        self.window_frames += 1;

        let window = now.saturating_duration_since(self.window_start);
        if window >= FPS_WINDOW {
            self.sample = Some(self.window_frames as f32 / window.as_secs_f32());
            self.window_start = now;
            self.window_frames = 0;
        }

        now.saturating_duration_since(self.start).as_secs_f32()
    }

    /// Frames counted so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// FPS measured since the last call, if a full window has passed.
    pub fn take_fps(&mut self) -> Option<f32> {
        self.sample.take()
    }
}

impl Default for SceneClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_reports_seconds_since_start() {
        let start = Instant::now();
        let mut clock = SceneClock::starting_at(start);
        let t = clock.tick_at(start + Duration::from_millis(250));
        assert!((t - 0.25).abs() < 1e-4);
        assert_eq!(clock.frames(), 1);
    }

    #[test]
    fn test_fps_sampled_once_per_window() {
        let start = Instant::now();
        let mut clock = SceneClock::starting_at(start);
        for i in 1..=30 {
            clock.tick_at(start + Duration::from_millis(i * 20));
        }
        assert_eq!(clock.take_fps(), None);

        for i in 31..=60 {
            clock.tick_at(start + Duration::from_millis(i * 20));
        }
        let fps = clock.take_fps().unwrap();
        assert!((fps - 50.0).abs() < 0.5);
        assert_eq!(clock.take_fps(), None);
    }

    #[test]
    fn test_clock_never_runs_backwards() {
        let start = Instant::now();
        let mut clock = SceneClock::starting_at(start + Duration::from_secs(1));
        assert_eq!(clock.tick_at(start), 0.0);
    }
}
