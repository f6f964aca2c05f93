use std::time::Duration;

/// Total number of requests made for one completion, including the first.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Wait unit between rate-limited attempts; attempt `n` waits `n` steps.
pub const DEFAULT_BACKOFF_STEP: Duration = Duration::from_secs(2);

/// Bounded linear back-off for rate-limited completion requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetrySchedule {
    max_attempts: u32,
    backoff_step: Duration,
}

impl RetrySchedule {
    /// Creates a schedule. `max_attempts` is clamped to at least one.
    pub fn new(max_attempts: u32, backoff_step: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff_step,
        }
    }

    /// Total number of requests allowed, including the first.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Returns `true` if another attempt may follow `attempt` (1-based).
    pub fn allows_attempt_after(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// Wait after rate-limited `attempt` (1-based): `attempt` back-off steps.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.backoff_step.saturating_mul(attempt)
    }
}

impl Default for RetrySchedule {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_BACKOFF_STEP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_schedule_waits_two_then_four_seconds() {
        let schedule = RetrySchedule::default();
        assert_eq!(schedule.max_attempts(), 3);
        assert_eq!(schedule.delay_after(1), Duration::from_secs(2));
        assert_eq!(schedule.delay_after(2), Duration::from_secs(4));
    }

    #[test]
    fn attempts_are_bounded() {
        let schedule = RetrySchedule::default();
        assert!(schedule.allows_attempt_after(1));
        assert!(schedule.allows_attempt_after(2));
        assert!(!schedule.allows_attempt_after(3));
    }

    #[test]
    fn zero_attempts_is_clamped_to_one() {
        let schedule = RetrySchedule::new(0, Duration::from_millis(1));
        assert_eq!(schedule.max_attempts(), 1);
        assert!(!schedule.allows_attempt_after(1));
    }
}
