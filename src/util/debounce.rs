//! Debounce timer primitive
//!
//! A single-flight deadline: scheduling while a deadline is pending replaces
//! it, so a burst of triggers coalesces into one firing. The host loop polls
//! `fire_due` with its notion of "now"; nothing here reads the clock, which
//! keeps debounced paths deterministic under test.

use std::time::{Duration, Instant};

/// Timer/cancel pair used for input coalescing and topology re-scans
#[derive(Debug)]
pub struct Debounce {
    window: Duration,
    deadline: Option<Instant>,
}

impl Debounce {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    /// Schedule (or re-schedule) the deadline `window` after `now`.
    ///
    /// A pending deadline is replaced, never queued: the last trigger in a
    /// burst decides when the single firing happens.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    /// Drop any pending deadline
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns true (and clears the deadline) once `now` has passed it
    pub fn fire_due(&mut self, now: Instant) -> bool {
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
    fn fires_only_after_window() {
        let start = Instant::now();
        let mut d = Debounce::new(Duration::from_millis(100));
        d.schedule(start);

        assert!(!d.fire_due(start));
        assert!(!d.fire_due(start + Duration::from_millis(99)));
        assert!(d.fire_due(start + Duration::from_millis(100)));
        // One-shot: cleared after firing
        assert!(!d.fire_due(start + Duration::from_millis(200)));
    }

    #[test]
    fn reschedule_replaces_pending_deadline() {
        let start = Instant::now();
        let mut d = Debounce::new(Duration::from_millis(100));
        d.schedule(start);
        d.schedule(start + Duration::from_millis(50));

        assert!(!d.fire_due(start + Duration::from_millis(100)));
        assert!(d.fire_due(start + Duration::from_millis(150)));
    }

    #[test]
    fn cancel_clears() {
        let start = Instant::now();
        let mut d = Debounce::new(Duration::from_millis(100));
        d.schedule(start);
        d.cancel();
        assert!(!d.is_pending());
        assert!(!d.fire_due(start + Duration::from_secs(1)));
    }
}
