use std::time::{Duration, Instant};

/// Counts rendered frames and publishes a frames-per-second figure once a
/// second of wall time has elapsed.
#[derive(Debug)]
pub struct FrameCounter {
    window_start: Option<Instant>,
    frames_in_window: u32,
    fps: u32,
    last_frame: Option<Instant>,
    timer: FrameTimer,
}

impl FrameCounter {
    pub fn new() -> Self {
        Self {
            window_start: None,
            frames_in_window: 0,
            fps: 0,
            last_frame: None,
            timer: FrameTimer::new(120),
        }
    }

    /// Record a frame at `now`. Returns the currently published FPS.
    pub fn tick_at(&mut self, now: Instant) -> u32 {
        if let Some(last) = self.last_frame {
            self.timer.record(now.saturating_duration_since(last));
        }
        self.last_frame = Some(now);

        match self.window_start {
            None => {
                self.window_start = Some(now);
                self.frames_in_window = 1;
            }
            Some(start) if now.saturating_duration_since(start) >= Duration::from_secs(1) => {
                self.fps = self.frames_in_window;
                tracing::trace!(fps = self.fps, "fps window rolled");
                self.window_start = Some(now);
                self.frames_in_window = 1;
            }
            Some(_) => self.frames_in_window += 1,
        }
        self.fps
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn frame_times(&self) -> &FrameTimer {
        &self.timer
    }
}

impl Default for FrameCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Rolling history of frame intervals.
#[derive(Debug)]
pub struct FrameTimer {
    history: Vec<Duration>,
    capacity: usize,
    index: usize,
    filled: bool,
}

impl FrameTimer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            history: vec![Duration::ZERO; capacity],
            capacity,
            index: 0,
            filled: false,
        }
    }

    pub fn record(&mut self, dt: Duration) {
        self.history[self.index] = dt;
        self.index = (self.index + 1) % self.capacity;
        if self.index == 0 {
            self.filled = true;
        }
    }

    pub fn average(&self) -> Duration {
        let count = self.count();
        if count == 0 {
            return Duration::ZERO;
        }
        let total: Duration = self.history[..count].iter().sum();
        total / count as u32
    }

    pub fn max(&self) -> Duration {
        self.history[..self.count()]
            .iter()
            .copied()
            .max()
            .unwrap_or(Duration::ZERO)
    }

    pub fn min(&self) -> Duration {
        self.history[..self.count()]
            .iter()
            .copied()
            .min()
            .unwrap_or(Duration::ZERO)
    }

    pub fn count(&self) -> usize {
        if self.filled {
            self.capacity
        } else {
            self.index
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_published_after_one_second() {
        let mut counter = FrameCounter::new();
        let start = Instant::now();
        for i in 0..60 {
            counter.tick_at(start + Duration::from_millis(i * 16));
        }
        assert_eq!(counter.fps(), 0);

        let fps = counter.tick_at(start + Duration::from_millis(1000));
        assert_eq!(fps, 60);
        assert_eq!(counter.fps(), 60);
    }

    #[test]
    fn fps_window_restarts() {
        let mut counter = FrameCounter::new();
        let start = Instant::now();
        counter.tick_at(start);
        counter.tick_at(start + Duration::from_millis(1000));
        assert_eq!(counter.fps(), 1);
        for i in 1..30 {
            counter.tick_at(start + Duration::from_millis(1000 + i * 33));
        }
        counter.tick_at(start + Duration::from_millis(2000));
        assert_eq!(counter.fps(), 30);
    }

    #[test]
    fn frame_intervals_recorded() {
        let mut counter = FrameCounter::new();
        let start = Instant::now();
        counter.tick_at(start);
        counter.tick_at(start + Duration::from_millis(10));
        counter.tick_at(start + Duration::from_millis(30));
        let times = counter.frame_times();
        assert_eq!(times.count(), 2);
        assert_eq!(times.average(), Duration::from_millis(15));
        assert_eq!(times.max(), Duration::from_millis(20));
        assert_eq!(times.min(), Duration::from_millis(10));
    }

    #[test]
    fn frame_timer_wraps_around() {
        let mut timer = FrameTimer::new(2);
        timer.record(Duration::from_millis(10));
        timer.record(Duration::from_millis(20));
        timer.record(Duration::from_millis(30));

        assert_eq!(timer.count(), 2);
        assert_eq!(timer.average(), Duration::from_millis(25));
    }

    #[test]
    fn empty_timer_is_zero() {
        let timer = FrameTimer::new(4);
        assert_eq!(timer.average(), Duration::ZERO);
        assert_eq!(timer.max(), Duration::ZERO);
    }
}
