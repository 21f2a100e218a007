use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Paces presentation to a target rate. Missed deadlines are dropped rather
/// than caught up, since every pass runs the script's `draw` exactly once.
#[derive(Debug)]
pub struct FrameClock {
    fps: u32,
    frame_count: u64,
    last_frame: Instant,
    next_deadline: Instant,
    frame_intervals: VecDeque<Duration>,
    max_intervals: usize,
}

impl FrameClock {
    pub fn new(fps: u32) -> Self {
        Self::with_start(fps, Instant::now())
    }

    pub fn with_start(fps: u32, now: Instant) -> Self {
        let mut clock = Self {
            fps: fps.max(1),
            frame_count: 0,
            last_frame: now,
            next_deadline: now,
            frame_intervals: VecDeque::new(),
            max_intervals: 90,
        };
        clock.next_deadline = now + clock.frame_duration();
        clock
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn set_fps(&mut self, fps: u32) {
        self.fps = fps.max(1);
        self.next_deadline = self.last_frame + self.frame_duration();
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps as f64)
    }

    pub fn next_deadline(&self) -> Instant {
        self.next_deadline
    }

    /// Time left before the next frame may be presented.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.next_deadline.saturating_duration_since(now)
    }

    pub fn average_fps(&self) -> f32 {
        if self.frame_intervals.is_empty() {
            return 0.0;
        }

        let sum: Duration = self.frame_intervals.iter().copied().sum();
        let avg = sum / self.frame_intervals.len() as u32;

        if avg.is_zero() {
            return 0.0;
        }

        1.0 / avg.as_secs_f32()
    }

    /// Marks a frame as presented at `now` and schedules the next one.
    pub fn finish_frame(&mut self, now: Instant) {
        let interval = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;
        self.frame_count += 1;
        self.record_interval(interval);

        let frame_duration = self.frame_duration();
        self.next_deadline = if now > self.next_deadline {
            now + frame_duration
        } else {
            self.next_deadline + frame_duration
        };
    }

    /// Blocks until the next deadline, then marks the frame.
    pub fn wait_and_finish(&mut self) {
        let remaining = self.remaining(Instant::now());
        if !remaining.is_zero() {
            std::thread::sleep(remaining);
        }
        self.finish_frame(Instant::now());
    }

    fn record_interval(&mut self, interval: Duration) {
        self.frame_intervals.push_back(interval);
        if self.frame_intervals.len() > self.max_intervals {
            self.frame_intervals.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waits_out_the_rest_of_the_frame() {
        let start = Instant::now();
        let clock = FrameClock::with_start(50, start);

        let half = start + clock.frame_duration() / 2;
        assert_eq!(clock.remaining(half), clock.frame_duration() / 2);
        assert_eq!(
            clock.remaining(start + clock.frame_duration()),
            Duration::ZERO
        );
    }

    #[test]
    fn on_time_frames_keep_a_steady_cadence() {
        let start = Instant::now();
        let mut clock = FrameClock::with_start(30, start);
        let frame = clock.frame_duration();

        clock.finish_frame(start + frame);
        assert_eq!(clock.next_deadline(), start + frame * 2);
        assert_eq!(clock.frame_count(), 1);
    }

    #[test]
    fn late_frames_do_not_accumulate_debt() {
        let start = Instant::now();
        let mut clock = FrameClock::with_start(30, start);
        let frame = clock.frame_duration();

        let late = start + frame * 4;
        clock.finish_frame(late);
        assert_eq!(clock.next_deadline(), late + frame);
        assert_eq!(clock.remaining(late), frame);
    }

    #[test]
    fn applies_runtime_fps_changes() {
        let start = Instant::now();
        let mut clock = FrameClock::with_start(60, start);
        clock.set_fps(30);
        assert_eq!(clock.fps(), 30);
        assert_eq!(clock.next_deadline(), start + clock.frame_duration());

        clock.set_fps(0);
        assert_eq!(clock.fps(), 1);
    }

    #[test]
    fn average_fps_tracks_intervals() {
        let start = Instant::now();
        let mut clock = FrameClock::with_start(50, start);
        assert_eq!(clock.average_fps(), 0.0);

        let frame = Duration::from_millis(20);
        for i in 1..=5 {
            clock.finish_frame(start + frame * i);
        }
        assert!((clock.average_fps() - 50.0).abs() < 0.5);
    }
}
