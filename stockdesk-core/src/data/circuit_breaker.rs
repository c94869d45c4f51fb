//! Circuit breaker for the upstream market-data feed.
//!
//! After `failure_threshold` consecutive failed fetches, or a single HTTP 403,
//! the breaker opens and every request is refused until the cooldown elapses.
//! A refused request is reported to the pipeline like any other fetch failure.

use parking_lot::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Closed { consecutive_failures: u32 },
    Open { since: Instant },
}

#[derive(Debug)]
pub struct CircuitBreaker {
    state: Mutex<State>,
    cooldown: Duration,
    failure_threshold: u32,
}

impl CircuitBreaker {
    pub fn new(cooldown: Duration, failure_threshold: u32) -> Self {
        Self {
            state: Mutex::new(State::Closed {
                consecutive_failures: 0,
            }),
            cooldown,
            failure_threshold: failure_threshold.max(1),
        }
    }

    /// Whether a request may go out now. Closes the breaker once the cooldown
    /// has elapsed.
    pub fn allows_request(&self) -> bool {
        let mut state = self.state.lock();
        match *state {
            State::Closed { .. } => true,
            State::Open { since } if since.elapsed() >= self.cooldown => {
                tracing::info!("market-data circuit breaker closed after cooldown");
                *state = State::Closed {
                    consecutive_failures: 0,
                };
                true
            }
            State::Open { .. } => false,
        }
    }

    pub fn record_success(&self) {
        *self.state.lock() = State::Closed {
            consecutive_failures: 0,
        };
    }

    pub fn record_failure(&self) {
        let mut state = self.state.lock();
        if let State::Closed {
            consecutive_failures,
        } = *state
        {
            let failures = consecutive_failures + 1;
            if failures >= self.failure_threshold {
                tracing::warn!(
                    failures,
                    cooldown_secs = self.cooldown.as_secs(),
                    "market-data circuit breaker opened"
                );
                *state = State::Open {
                    since: Instant::now(),
                };
            } else {
                *state = State::Closed {
                    consecutive_failures: failures,
                };
            }
        }
    }

    /// Open immediately (the provider has blocked us).
    pub fn trip(&self) {
        tracing::warn!("market-data circuit breaker tripped by provider block");
        *self.state.lock() = State::Open {
            since: Instant::now(),
        };
    }

    /// Time left before requests are allowed again (zero when closed).
    pub fn remaining_cooldown(&self) -> Duration {
        match *self.state.lock() {
            State::Closed { .. } => Duration::ZERO,
            State::Open { since } => self.cooldown.saturating_sub(since.elapsed()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_closed() {
        let cb = CircuitBreaker::new(Duration::from_secs(60), 3);
        assert!(cb.allows_request());
        assert_eq!(cb.remaining_cooldown(), Duration::ZERO);
    }

    #[test]
    fn opens_at_threshold() {
        let cb = CircuitBreaker::new(Duration::from_secs(60), 3);
        cb.record_failure();
        cb.record_failure();
        assert!(cb.allows_request());
        cb.record_failure();
        assert!(!cb.allows_request());
        assert!(cb.remaining_cooldown() > Duration::ZERO);
    }

    #[test]
    fn success_resets_the_count() {
        let cb = CircuitBreaker::new(Duration::from_secs(60), 2);
        cb.record_failure();
        cb.record_success();
        cb.record_failure();
        assert!(cb.allows_request());
    }

    #[test]
    fn trip_opens_immediately() {
        let cb = CircuitBreaker::new(Duration::from_secs(60), 3);
        cb.trip();
        assert!(!cb.allows_request());
    }

    #[test]
    fn closes_after_cooldown() {
        let cb = CircuitBreaker::new(Duration::from_millis(10), 1);
        cb.record_failure();
        assert!(!cb.allows_request());
        std::thread::sleep(Duration::from_millis(15));
        assert!(cb.allows_request());
    }
}
