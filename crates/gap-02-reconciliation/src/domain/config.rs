//! Poll parameters.

use std::time::Duration;

/// Fetch cap shared by every mutation flow.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 1000;

/// Fixed sleep between fetches.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1500);

/// Reconciliation configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReconcileConfig {
    /// Maximum number of fetches before giving up
    pub max_attempts: u32,
    /// Sleep between fetches
    pub poll_interval: Duration,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl ReconcileConfig {
    pub fn new(max_attempts: u32, poll_interval: Duration) -> Self {
        Self {
            max_attempts,
            poll_interval,
        }
    }

    /// Upper bound on time spent sleeping in one run.
    pub fn max_wait(&self) -> Duration {
        self.poll_interval * self.max_attempts.saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReconcileConfig::default();
        assert_eq!(config.max_attempts, 1000);
        assert_eq!(config.poll_interval, Duration::from_millis(1500));
    }

    #[test]
    fn test_max_wait_excludes_trailing_sleep() {
        let config = ReconcileConfig::new(3, Duration::from_secs(1));
        assert_eq!(config.max_wait(), Duration::from_secs(2));
        assert_eq!(ReconcileConfig::new(0, Duration::from_secs(1)).max_wait(), Duration::ZERO);
    }
}
