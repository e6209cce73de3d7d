//! Owned, cancellable schedulers for hover throttling and unhighlight
//! grace delays. Callers pass the current `Instant` explicitly, which keeps
//! the engine single-threaded and the tests deterministic; `cancel()` is
//! called uniformly on disable and teardown so no stale deadline ever fires
//! against torn-down state.

use std::time::{Duration, Instant};

/// Rate limiter: at most one allowed event per interval window.
#[derive(Debug)]
pub struct Throttle {
    interval: Duration,
    last: Option<Instant>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// Whether an event at `now` falls outside the current window. Opens a
    /// new window when it does.
    pub fn allow_at(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }

    pub fn cancel(&mut self) {
        self.last = None;
    }
}

/// Single-shot delay: armed with a deadline, fired (at most once) by a later
/// tick, or cancelled.
#[derive(Debug)]
pub struct Debounce {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debounce {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// (Re-)arm the delay, replacing any pending deadline.
    pub fn arm_at(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Whether the pending deadline has passed. Consumes it when it has.
    pub fn fire_ready(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throttle_gates_within_the_window() {
        let mut throttle = Throttle::new(Duration::from_millis(150));
        let start = Instant::now();
        assert!(throttle.allow_at(start));
        assert!(!throttle.allow_at(start + Duration::from_millis(50)));
        assert!(throttle.allow_at(start + Duration::from_millis(200)));
    }

    #[test]
    fn throttle_cancel_reopens_the_window() {
        let mut throttle = Throttle::new(Duration::from_millis(150));
        let start = Instant::now();
        assert!(throttle.allow_at(start));
        throttle.cancel();
        assert!(throttle.allow_at(start + Duration::from_millis(1)));
    }

    #[test]
    fn debounce_fires_once_after_the_delay() {
        let mut debounce = Debounce::new(Duration::from_millis(200));
        let start = Instant::now();
        assert!(!debounce.fire_ready(start));
        debounce.arm_at(start);
        assert!(!debounce.fire_ready(start + Duration::from_millis(100)));
        assert!(debounce.fire_ready(start + Duration::from_millis(250)));
        assert!(!debounce.fire_ready(start + Duration::from_millis(300)));
    }

    #[test]
    fn debounce_cancel_discards_the_deadline() {
        let mut debounce = Debounce::new(Duration::from_millis(200));
        let start = Instant::now();
        debounce.arm_at(start);
        debounce.cancel();
        assert!(!debounce.fire_ready(start + Duration::from_secs(1)));
    }
}
