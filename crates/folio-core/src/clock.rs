#![forbid(unsafe_code)]

//! Monotonic time as a host capability.
//!
//! Every timer deadline in folio is a [`Duration`] since an arbitrary host
//! epoch. The browser host reads `performance.now()`; tests advance a
//! [`DeterministicClock`] by hand.

use core::time::Duration;

/// Source of monotonic time.
pub trait Clock {
    /// Time since the host epoch. Never decreases.
    fn now_mono(&self) -> Duration;
}

/// Deterministic monotonic clock controlled by the caller.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Set current monotonic time. Earlier values are ignored.
    pub fn set(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

impl Clock for DeterministicClock {
    fn now_mono(&self) -> Duration {
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero() {
        assert_eq!(DeterministicClock::new().now_mono(), Duration::ZERO);
    }

    #[test]
    fn advance_accumulates() {
        let mut clock = DeterministicClock::new();
        clock.advance(Duration::from_millis(40));
        clock.advance(Duration::from_millis(60));
        assert_eq!(clock.now_mono(), Duration::from_millis(100));
    }

    #[test]
    fn set_never_moves_backwards() {
        let mut clock = DeterministicClock::new();
        clock.set(Duration::from_millis(500));
        clock.set(Duration::from_millis(200));
        assert_eq!(clock.now_mono(), Duration::from_millis(500));
    }
}
