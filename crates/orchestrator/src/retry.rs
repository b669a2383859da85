//! Retry policies for the two generation layers.

use std::time::Duration;

/// Bounded retry with a fixed delay between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    /// Create a policy. `max_attempts` below one is raised to one.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Policy for single provider calls: 3 attempts, 2 seconds apart.
    pub fn transport() -> Self {
        Self::new(3, Duration::from_secs(2))
    }

    /// Policy for whole generations: 5 attempts, back to back.
    pub fn semantic() -> Self {
        Self::new(5, Duration::ZERO)
    }

    /// Total attempts, including the first. Never zero.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Pause after a failed attempt that is not the last.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Same attempt bound without any delay.
    pub fn without_delay(self) -> Self {
        Self::new(self.max_attempts, Duration::ZERO)
    }

    /// Check if another attempt follows attempt number `attempt` (1-based).
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// Wait before the next attempt.
    pub(crate) async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(RetryPolicy::transport().max_attempts(), 3);
        assert_eq!(RetryPolicy::transport().delay(), Duration::from_secs(2));
        assert_eq!(RetryPolicy::semantic().max_attempts(), 5);
        assert!(RetryPolicy::semantic().delay().is_zero());
    }

    #[test]
    fn test_zero_attempts_raised() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts(), 1);
    }

    #[test]
    fn test_should_retry() {
        let policy = RetryPolicy::transport();
        assert!(policy.should_retry(1));
        assert!(policy.should_retry(2));
        assert!(!policy.should_retry(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_uses_delay() {
        let policy = RetryPolicy::transport();
        let start = tokio::time::Instant::now();
        policy.pause().await;
        assert!(start.elapsed() >= Duration::from_secs(2));
    }

    #[test]
    fn test_without_delay() {
        let policy = RetryPolicy::transport().without_delay();
        assert_eq!(policy.max_attempts(), 3);
        assert!(policy.delay().is_zero());
    }
}
