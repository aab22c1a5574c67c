//! Frame timing for the fixed-rate render loop

use std::time::{Duration, Instant};

/// Monotonic renderer clock plus fixed-rate tick scheduling.
///
/// `elapsed_secs` is the value written into the `time` uniform; it only ever
/// moves forward and is measured from the last (re)start.
pub struct FrameClock {
    start: Instant,
    frame_interval: Duration,
    next_deadline: Instant,
    frame_count: u64,
    fps_timer: Instant,
    fps: f32,
    fps_frame_count: u32,
}

impl FrameClock {
    /// Create a clock ticking at `frames_per_second` (clamped to at least 1).
    pub fn new(frames_per_second: u32) -> Self {
        let now = Instant::now();
        let frame_interval = Duration::from_secs_f64(1.0 / frames_per_second.max(1) as f64);
        Self {
            start: now,
            frame_interval,
            next_deadline: now + frame_interval,
            frame_count: 0,
            fps_timer: now,
            fps: 0.0,
            fps_frame_count: 0,
        }
    }

    /// Seconds since the clock (re)started.
    ///
    /// `f32` resolution degrades with uptime: steps stay below 1 ms for about
    /// 2.3 hours, a 60 Hz frame step rounds to 1/64 s after one day and to
    /// 1/32 s after six. Long-running loops call [`restart`](Self::restart)
    /// whenever a jump in the animation cannot be seen.
    pub fn elapsed_secs(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }

    /// Reset `elapsed_secs` to zero. Tick schedule and counters are kept.
    pub fn restart(&mut self) {
        self.start = Instant::now();
    }

    /// Call once per frame to update timing
    pub fn tick(&mut self) {
        let now = Instant::now();
        self.frame_count += 1;
        self.fps_frame_count += 1;

        // Update FPS every second
        let fps_elapsed = now - self.fps_timer;
        if fps_elapsed >= Duration::from_secs(1) {
            self.fps = self.fps_frame_count as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = 0;
            self.fps_timer = now;
        }
    }

    /// Deadline of the next tick.
    pub fn next_deadline(&self) -> Instant {
        self.next_deadline
    }

    /// Block until the next tick is due, then schedule the one after it.
    ///
    /// If the loop fell behind by more than one interval the schedule is
    /// re-anchored at `now` instead of firing a burst of catch-up frames.
    pub fn sleep_until_next_tick(&mut self) {
        let now = Instant::now();
        if self.next_deadline > now {
            std::thread::sleep(self.next_deadline - now);
            self.next_deadline += self.frame_interval;
        } else if now - self.next_deadline > self.frame_interval {
            self.next_deadline = now + self.frame_interval;
        } else {
            self.next_deadline += self.frame_interval;
        }
    }

    /// Target interval between ticks.
    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    /// Get current FPS (updated every second)
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Get total frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_from_rate() {
        let clock = FrameClock::new(60);
        let micros = clock.frame_interval().as_micros();
        assert!((16_600..=16_700).contains(&micros), "interval = {micros}us");
    }

    #[test]
    fn test_zero_rate_clamped() {
        let clock = FrameClock::new(0);
        assert_eq!(clock.frame_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_elapsed_is_monotonic() {
        let clock = FrameClock::new(60);
        let a = clock.elapsed_secs();
        std::thread::sleep(Duration::from_millis(2));
        let b = clock.elapsed_secs();
        assert!(b > a, "{b} should be after {a}");
    }

    #[test]
    fn test_sleep_advances_deadline() {
        let mut clock = FrameClock::new(200);
        let first = clock.next_deadline();
        clock.sleep_until_next_tick();
        assert!(Instant::now() >= first);
        assert!(clock.next_deadline() > first);
    }

    #[test]
    fn test_tick_counts_frames() {
        let mut clock = FrameClock::default();
        clock.tick();
        clock.tick();
        assert_eq!(clock.frame_count(), 2);
    }

    #[test]
    fn test_restart_resets_elapsed_only() {
        let mut clock = FrameClock::new(60);
        std::thread::sleep(Duration::from_millis(20));
        clock.tick();
        let before = clock.elapsed_secs();
        clock.restart();
        assert!(clock.elapsed_secs() < before);
        assert!(clock.elapsed_secs() < 0.015);
        assert_eq!(clock.frame_count(), 1);
    }

    #[test]
    fn test_one_day_loses_frame_resolution() {
        // Documents why long-running loops restart the clock
        let day = 86_400.0_f32;
        let step = (day + 1.0 / 60.0) - day;
        assert_eq!(step, 1.0 / 64.0);
    }
}
