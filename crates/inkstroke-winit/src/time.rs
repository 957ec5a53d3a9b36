use std::time::{Duration, Instant};

use inkstroke_core::profiling::profile_function;

/// Frame timing information handed to [`App::update`](crate::app::App::update).
///
/// `elapsed` is measured from the moment the loop started, so it plays the
/// role of a clock's elapsed time and never decreases between frames.
#[derive(Debug, Clone)]
pub struct FrameTime {
    /// Time elapsed since the last frame
    pub delta: Duration,
    /// Total time elapsed since the loop started
    pub elapsed: Duration,
    /// Total number of frames ticked
    pub frame_count: u64,
}

impl FrameTime {
    pub fn new() -> Self {
        Self {
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
        }
    }

    #[inline]
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    #[inline]
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }
}

impl Default for FrameTime {
    fn default() -> Self {
        Self::new()
    }
}

/// Tracks time for the app loop.
///
/// Backed by [`Instant`], which is monotonic, so successive ticks report a
/// non-decreasing `elapsed`.
pub struct TimeTracker {
    start_time: Instant,
    last_frame_time: Instant,
    frame_count: u64,
}

impl TimeTracker {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_frame_time: now,
            frame_count: 0,
        }
    }

    pub fn tick(&mut self) -> FrameTime {
        profile_function!();
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame_time);
        let elapsed = now.duration_since(self.start_time);

        self.last_frame_time = now;
        self.frame_count += 1;

        FrameTime {
            delta,
            elapsed,
            frame_count: self.frame_count,
        }
    }
}

impl Default for TimeTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_is_non_decreasing() {
        let mut tracker = TimeTracker::new();
        let mut last = Duration::ZERO;
        for _ in 0..100 {
            let frame = tracker.tick();
            assert!(frame.elapsed >= last);
            last = frame.elapsed;
        }
    }

    #[test]
    fn frame_count_increments() {
        let mut tracker = TimeTracker::new();
        tracker.tick();
        let frame = tracker.tick();
        assert_eq!(frame.frame_count, 2);
    }

    #[test]
    fn delta_sums_to_elapsed() {
        let mut tracker = TimeTracker::new();
        let mut total = Duration::ZERO;
        let mut frame = FrameTime::new();
        for _ in 0..10 {
            std::thread::sleep(Duration::from_millis(1));
            frame = tracker.tick();
            total += frame.delta;
        }
        assert_eq!(total, frame.elapsed);
    }
}
