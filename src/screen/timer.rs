//! Cooperative screen timers
//!
//! Timers are plain deadlines polled by the owning screen with an explicit
//! `now`, so they die with the screen and can be driven by a test clock.
//! Disarming is always safe, armed or not.

use std::time::{Duration, Instant};

/// One-shot cancelable timer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScreenTimer {
    deadline: Option<Instant>,
}

impl ScreenTimer {
    /// Arm (or re-arm) to fire `delay` after `now`
    pub fn arm(&mut self, now: Instant, delay: Duration) {
        self.deadline = Some(now + delay);
    }

    pub fn disarm(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Armed and not yet due
    pub fn is_running(&self, now: Instant) -> bool {
        self.deadline.map(|deadline| now < deadline).unwrap_or(false)
    }

    /// Returns true once when the deadline has passed, disarming the timer
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Repeating timer (progress refresh)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PeriodicTimer {
    interval: Duration,
    next: Option<Instant>,
}

impl PeriodicTimer {
    pub fn new(interval: Duration) -> Self {
        Self { interval, next: None }
    }

    /// Start ticking; the first tick is due immediately
    pub fn start(&mut self, now: Instant) {
        self.next = Some(now);
    }

    pub fn stop(&mut self) {
        self.next = None;
    }

    /// True when a tick is due; missed ticks are coalesced into one
    pub fn due(&mut self, now: Instant) -> bool {
        match self.next {
            Some(next) if now >= next => {
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
    fn test_one_shot_fires_once() {
        let start = Instant::now();
        let mut timer = ScreenTimer::default();
        timer.disarm();
        assert!(!timer.fire_if_due(start));

        timer.arm(start, Duration::from_millis(300));
        assert!(timer.is_running(start + Duration::from_millis(299)));
        assert!(!timer.fire_if_due(start + Duration::from_millis(299)));
        assert!(timer.fire_if_due(start + Duration::from_millis(300)));
        assert!(!timer.fire_if_due(start + Duration::from_secs(10)));
        assert!(!timer.is_armed());
    }

    #[test]
    fn test_rearm_pushes_deadline() {
        let start = Instant::now();
        let mut timer = ScreenTimer::default();
        timer.arm(start, Duration::from_secs(3));
        timer.arm(start + Duration::from_secs(2), Duration::from_secs(3));
        assert!(!timer.fire_if_due(start + Duration::from_secs(4)));
        assert!(timer.fire_if_due(start + Duration::from_secs(5)));
    }

    #[test]
    fn test_periodic_coalesces_missed_ticks() {
        let start = Instant::now();
        let mut timer = PeriodicTimer::new(Duration::from_secs(1));
        assert!(!timer.due(start));

        timer.start(start);
        assert!(timer.due(start));
        assert!(!timer.due(start + Duration::from_millis(500)));
        assert!(timer.due(start + Duration::from_secs(5)));
        assert!(!timer.due(start + Duration::from_millis(5_500)));

        timer.stop();
        assert!(!timer.due(start + Duration::from_secs(60)));
    }
}
