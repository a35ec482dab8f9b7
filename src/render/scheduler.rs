//! Cancellable frame scheduler.

use std::time::{Duration, Instant};

/// Repeating per-frame task handle.
///
/// The scheduler never blocks; the event loop asks how long it may wait and
/// then polls. Once [`FrameScheduler::cancel`] is called no further frame
/// fires until it is started again.
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    interval: Duration,
    next: Option<Instant>,
}

impl FrameScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            next: None,
        }
    }

    /// Scheduler firing `fps` times per second.
    pub fn with_rate(fps: u32) -> Self {
        Self::new(Duration::from_micros(1_000_000 / fps.max(1) as u64))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Arm the scheduler; the first frame is due immediately.
    pub fn start(&mut self, now: Instant) {
        self.next = Some(now);
    }

    pub fn cancel(&mut self) {
        self.next = None;
    }

    pub fn is_running(&self) -> bool {
        self.next.is_some()
    }

    /// Time until the next frame is due, or `None` when cancelled.
    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        self.next.map(|due| due.saturating_duration_since(now))
    }

    /// Returns true if a frame is due at `now`, re-arming for the next one.
    ///
    /// Missed frames are dropped rather than replayed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next {
            Some(due) if now >= due => {
                self.next = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_per_interval() {
        let mut scheduler = FrameScheduler::new(Duration::from_millis(16));
        let t0 = Instant::now();
        assert!(!scheduler.poll(t0));

        scheduler.start(t0);
        assert!(scheduler.poll(t0));
        assert!(!scheduler.poll(t0 + Duration::from_millis(10)));
        assert_eq!(
            scheduler.time_until_next(t0 + Duration::from_millis(10)),
            Some(Duration::from_millis(6))
        );
        assert!(scheduler.poll(t0 + Duration::from_millis(16)));
    }

    #[test]
    fn test_late_frames_do_not_burst() {
        let mut scheduler = FrameScheduler::new(Duration::from_millis(16));
        let t0 = Instant::now();
        scheduler.start(t0);
        assert!(scheduler.poll(t0));

        let late = t0 + Duration::from_millis(100);
        assert!(scheduler.poll(late));
        assert!(!scheduler.poll(late));
    }

    #[test]
    fn test_cancel_stops_ticks() {
        let mut scheduler = FrameScheduler::with_rate(60);
        let t0 = Instant::now();
        scheduler.start(t0);
        scheduler.cancel();
        assert!(!scheduler.is_running());
        assert!(!scheduler.poll(t0 + Duration::from_secs(1)));
        assert_eq!(scheduler.time_until_next(t0), None);
    }

    #[test]
    fn test_rate_conversion() {
        let scheduler = FrameScheduler::with_rate(50);
        assert_eq!(scheduler.interval(), Duration::from_millis(20));
        assert!(FrameScheduler::with_rate(0).interval() >= Duration::from_millis(1));
    }
}
