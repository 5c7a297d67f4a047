//! One-shot deadline timer driven by the host event loop

use std::time::{Duration, Instant};

/// A single pending deadline.
///
/// Nothing runs in the background: the owner polls [`OneShotTimer::fire`]
/// and the host sleeps until [`OneShotTimer::deadline`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OneShotTimer {
    deadline: Option<Instant>,
}

impl OneShotTimer {
    pub const fn new() -> Self {
        Self { deadline: None }
    }

    /// Schedule the timer, replacing any pending deadline
    pub fn arm(&mut self, now: Instant, delay: Duration) {
        self.deadline = Some(now + delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left until the deadline, zero once it has passed
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(now))
    }

    /// Disarm and report `true` if the deadline has been reached
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
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
    fn test_fires_once_after_deadline() {
        let start = Instant::now();
        let mut timer = OneShotTimer::new();
        assert_eq!(timer.deadline(), None);
        assert!(!timer.fire(start));

        timer.arm(start, Duration::from_millis(300));
        assert_eq!(timer.deadline(), Some(start + Duration::from_millis(300)));
        assert!(!timer.fire(start + Duration::from_millis(299)));
        assert!(timer.fire(start + Duration::from_millis(300)));
        assert_eq!(timer.deadline(), None);
        assert!(!timer.fire(start + Duration::from_millis(900)));
    }

    #[test]
    fn test_remaining() {
        let start = Instant::now();
        let mut timer = OneShotTimer::new();
        assert_eq!(timer.remaining(start), None);

        timer.arm(start, Duration::from_millis(300));
        assert_eq!(timer.remaining(start + Duration::from_millis(100)), Some(Duration::from_millis(200)));
        assert_eq!(timer.remaining(start + Duration::from_secs(1)), Some(Duration::ZERO));
    }

    #[test]
    fn test_cancel() {
        let start = Instant::now();
        let mut timer = OneShotTimer::new();
        timer.arm(start, Duration::from_millis(10));
        timer.cancel();
        assert_eq!(timer.deadline(), None);
        assert!(!timer.fire(start + Duration::from_secs(1)));
    }
}
