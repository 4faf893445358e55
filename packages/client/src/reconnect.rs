//! Reconnection backoff policy.

use std::time::Duration;

const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(1000);
const DEFAULT_MAX_DELAY: Duration = Duration::from_millis(16000);

/// Exponential backoff between connection attempts. No jitter.
///
/// The policy only decides how long to wait. It never replays joins;
/// after a reconnect the user re-issues them.
#[derive(Debug, Clone)]
pub struct ReconnectPolicy {
    initial_delay: Duration,
    max_delay: Duration,
    current_delay: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_INITIAL_DELAY, DEFAULT_MAX_DELAY)
    }
}

impl ReconnectPolicy {
    pub fn new(initial_delay: Duration, max_delay: Duration) -> Self {
        Self {
            initial_delay,
            max_delay,
            current_delay: initial_delay,
        }
    }

    /// The delay to wait before the next attempt. Doubles after each
    /// call, capped at `max_delay`.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current_delay;
        self.current_delay = (self.current_delay * 2).min(self.max_delay);
        delay
    }

    /// Reset after a successful connection.
    pub fn reset(&mut self) {
        self.current_delay = self.initial_delay;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_doubles_up_to_the_cap() {
        // given:
        let mut policy = ReconnectPolicy::default();

        // when/then: 1s, 2s, 4s, 8s, 16s, then capped
        let expected_ms = [1000, 2000, 4000, 8000, 16000, 16000, 16000];
        for expected in expected_ms {
            assert_eq!(policy.next_delay(), Duration::from_millis(expected));
        }
    }

    #[test]
    fn test_reset_returns_to_the_initial_delay() {
        // given: a policy that has backed off a few times
        let mut policy = ReconnectPolicy::default();
        policy.next_delay();
        policy.next_delay();
        policy.next_delay();

        // when:
        policy.reset();

        // then:
        assert_eq!(policy.next_delay(), Duration::from_millis(1000));
    }

    #[test]
    fn test_custom_delays() {
        // given:
        let mut policy =
            ReconnectPolicy::new(Duration::from_millis(250), Duration::from_millis(500));

        // when/then:
        assert_eq!(policy.next_delay(), Duration::from_millis(250));
        assert_eq!(policy.next_delay(), Duration::from_millis(500));
        assert_eq!(policy.next_delay(), Duration::from_millis(500));
    }
}
