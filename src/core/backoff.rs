//! Exponential-delay helper for the coordinator's idle path

use std::thread;
use std::time::Duration;

/// One delay unit. The first productive-less step yields instead of sleeping;
/// every later step sleeps the current delay and doubles it up to the cap.
const UNIT: Duration = Duration::from_millis(1);

pub(crate) struct Backoff {
    current: Duration,
    cap: Duration,
    total_wait: Duration,
}

impl Backoff {
    pub fn new(cap: Duration) -> Self {
        Self {
            current: Duration::ZERO,
            cap,
            total_wait: Duration::ZERO,
        }
    }

    /// Advance one step: yield on the first call after a reset, otherwise
    /// sleep the current delay and double it (capped).
    pub fn step(&mut self) {
        if self.current.is_zero() {
            thread::yield_now();
            self.current = UNIT;
        } else {
            thread::sleep(self.current);
            self.total_wait += self.current;
            self.current = (self.current * 2).min(self.cap);
        }
    }

    /// Back to the fresh state. Called whenever the coordinator did real work
    /// so busy traces do not carry stale delay.
    pub fn reset(&mut self) {
        self.current = Duration::ZERO;
        self.total_wait = Duration::ZERO;
    }

    /// Total time slept since construction or the last reset.
    pub fn total_wait(&self) -> Duration {
        self.total_wait
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_step_yields_without_sleeping() {
        let mut backoff = Backoff::new(Duration::from_millis(10));
        backoff.step();
        assert_eq!(backoff.total_wait(), Duration::ZERO);
        assert_eq!(backoff.current, UNIT);
    }

    #[test]
    fn delay_doubles_up_to_cap() {
        let mut backoff = Backoff::new(Duration::from_millis(4));
        backoff.step(); // yield, current = 1ms
        backoff.step(); // sleep 1ms, current = 2ms
        assert_eq!(backoff.current, Duration::from_millis(2));
        backoff.step(); // sleep 2ms, current = 4ms
        backoff.step(); // sleep 4ms, current capped at 4ms
        assert_eq!(backoff.current, Duration::from_millis(4));
        assert_eq!(backoff.total_wait(), Duration::from_millis(7));
    }

    #[test]
    fn reset_restores_fresh_state() {
        let mut backoff = Backoff::new(Duration::from_millis(4));
        backoff.step();
        backoff.step();
        backoff.reset();
        assert_eq!(backoff.current, Duration::ZERO);
        assert_eq!(backoff.total_wait(), Duration::ZERO);
    }
}
