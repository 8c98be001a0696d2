use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Monotonic time since some fixed origin
pub trait TimeSource {
    fn now(&self) -> Duration;
}

/// Wall-clock time source backed by [`Instant`]
#[derive(Debug, Clone, Copy)]
pub struct MonotonicTime {
    origin: Instant,
}

impl MonotonicTime {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicTime {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicTime {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-driven time source. Clones share the same instant, so a test can keep
/// one handle while the engine owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualTime {
    now: Rc<Cell<Duration>>,
}

impl ManualTime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn advance_secs(&self, secs: f64) {
        self.advance(Duration::from_secs_f64(secs));
    }

    pub fn set(&self, at: Duration) {
        self.now.set(at);
    }
}

impl TimeSource for ManualTime {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClockStatus {
    /// Not started, or cancelled
    Idle,
    Running { remaining_secs: f64 },
    /// Reported exactly once, on the tick that ran the clock out
    Expired,
    Stopped,
}

/// Single countdown from a fixed duration
#[derive(Debug, Clone)]
pub struct SessionClock {
    duration: Duration,
    started_at: Option<Duration>,
    frozen_elapsed: Option<Duration>,
}

impl SessionClock {
    pub fn new(duration_secs: u64) -> Self {
        Self {
            duration: Duration::from_secs(duration_secs),
            started_at: None,
            frozen_elapsed: None,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn start(&mut self, now: Duration) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    pub fn started_at(&self) -> Option<Duration> {
        self.started_at
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some() && self.frozen_elapsed.is_none()
    }

    pub fn is_stopped(&self) -> bool {
        self.frozen_elapsed.is_some()
    }

    pub fn elapsed(&self, now: Duration) -> Duration {
        match (self.started_at, self.frozen_elapsed) {
            (_, Some(frozen)) => frozen,
            (Some(start), None) => now.saturating_sub(start).min(self.duration),
            (None, None) => Duration::ZERO,
        }
    }

    pub fn elapsed_secs(&self, now: Duration) -> f64 {
        self.elapsed(now).as_secs_f64()
    }

    pub fn remaining_secs(&self, now: Duration) -> f64 {
        (self.duration - self.elapsed(now)).as_secs_f64()
    }

    /// True once a running clock has reached zero, even before it was ticked
    pub fn has_run_out(&self, now: Duration) -> bool {
        self.is_running() && self.elapsed(now) >= self.duration
    }

    pub fn tick(&mut self, now: Duration) -> ClockStatus {
        if self.started_at.is_none() {
            return ClockStatus::Idle;
        }
        if self.is_stopped() {
            return ClockStatus::Stopped;
        }
        if self.has_run_out(now) {
            self.frozen_elapsed = Some(self.duration);
            return ClockStatus::Expired;
        }
        ClockStatus::Running {
            remaining_secs: self.remaining_secs(now),
        }
    }

    /// Freezes elapsed time. Safe to call repeatedly and after expiry.
    pub fn stop(&mut self, now: Duration) {
        if self.is_running() {
            self.frozen_elapsed = Some(self.elapsed(now));
        }
    }

    /// Drops any pending countdown and returns to the unstarted state
    pub fn cancel(&mut self) {
        self.started_at = None;
        self.frozen_elapsed = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn secs(s: f64) -> Duration {
        Duration::from_secs_f64(s)
    }

    #[test]
    fn test_tick_before_start_is_idle() {
        let mut clock = SessionClock::new(30);
        assert_eq!(clock.tick(secs(5.0)), ClockStatus::Idle);
        assert_eq!(clock.elapsed(secs(5.0)), Duration::ZERO);
    }

    #[test]
    fn test_countdown() {
        let mut clock = SessionClock::new(10);
        clock.start(secs(100.0));

        assert_matches!(
            clock.tick(secs(102.5)),
            ClockStatus::Running { remaining_secs } if (remaining_secs - 7.5).abs() < 1e-9
        );
        assert!((clock.elapsed_secs(secs(104.0)) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_expires_once() {
        let mut clock = SessionClock::new(2);
        clock.start(Duration::ZERO);

        assert_eq!(clock.tick(secs(2.3)), ClockStatus::Expired);
        assert_eq!(clock.tick(secs(2.4)), ClockStatus::Stopped);
        assert_eq!(clock.elapsed(secs(50.0)), Duration::from_secs(2));
        assert_eq!(clock.remaining_secs(secs(50.0)), 0.0);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut clock = SessionClock::new(30);
        clock.start(Duration::ZERO);

        clock.stop(secs(4.0));
        clock.stop(secs(9.0));
        assert_eq!(clock.elapsed(secs(20.0)), secs(4.0));
        assert_eq!(clock.tick(secs(40.0)), ClockStatus::Stopped);

        let mut expired = SessionClock::new(1);
        expired.start(Duration::ZERO);
        assert_eq!(expired.tick(secs(1.0)), ClockStatus::Expired);
        expired.stop(secs(3.0));
        assert_eq!(expired.elapsed(secs(3.0)), Duration::from_secs(1));
    }

    #[test]
    fn test_has_run_out_without_tick() {
        let mut clock = SessionClock::new(5);
        clock.start(Duration::ZERO);

        assert!(!clock.has_run_out(secs(4.9)));
        assert!(clock.has_run_out(secs(5.0)));
    }

    #[test]
    fn test_cancel_resets() {
        let mut clock = SessionClock::new(5);
        clock.start(Duration::ZERO);
        clock.cancel();

        assert!(!clock.is_running());
        assert_eq!(clock.tick(secs(10.0)), ClockStatus::Idle);
    }

    #[test]
    fn test_manual_time_shared_between_clones() {
        let time = ManualTime::new();
        let engine_side = time.clone();

        time.advance_secs(1.5);
        time.advance(Duration::from_millis(500));
        assert_eq!(engine_side.now(), Duration::from_secs(2));

        time.set(Duration::from_secs(9));
        assert_eq!(engine_side.now(), Duration::from_secs(9));
    }

    #[test]
    fn test_monotonic_time_moves_forward() {
        let time = MonotonicTime::new();
        let a = time.now();
        let b = time.now();
        assert!(b >= a);
    }
}
