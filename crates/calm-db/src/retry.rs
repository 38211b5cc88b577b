//! Backoff policy for unprocessed batch-write items.
//!
//! A batched write may come back with some items unprocessed. That is a
//! store admission-control signal, not a logical error: the unprocessed
//! subset is resubmitted after an exponentially growing delay.

use std::time::Duration;

use calm_config::RetrySettings;

/// Configuration for retrying unprocessed items.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retries after the initial submission.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Maximum delay between retries (backoff is capped here).
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::from(&RetrySettings::default())
    }
}

impl From<&RetrySettings> for RetryConfig {
    fn from(settings: &RetrySettings) -> Self {
        Self {
            max_attempts: settings.max_attempts,
            base_delay: settings.base_delay(),
            max_delay: settings.max_delay(),
        }
    }
}

impl RetryConfig {
    /// Delay before retry number `attempt` (0-based): `base * 2^attempt`, capped.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base_delay
            .checked_mul(factor)
            .map_or(self.max_delay, |d| d.min(self.max_delay))
    }
}

/// Detect transient libSQL errors caused by lock contention.
///
/// The predicate is intentionally narrow to avoid retrying genuine
/// SQL or constraint errors.
pub fn is_transient_error(e: &libsql::Error) -> bool {
    let msg = e.to_string().to_ascii_lowercase();
    msg.contains("database is locked")
        || msg.contains("database table is locked")
        || msg.contains("database is busy")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_doubles_from_base() {
        let cfg = RetryConfig::default();
        assert_eq!(cfg.delay_for(0), Duration::from_millis(100));
        assert_eq!(cfg.delay_for(1), Duration::from_millis(200));
        assert_eq!(cfg.delay_for(6), Duration::from_millis(6400));
    }

    #[test]
    fn delay_is_capped() {
        let cfg = RetryConfig {
            max_attempts: 40,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(2),
        };
        assert_eq!(cfg.delay_for(5), Duration::from_secs(2));
        assert_eq!(cfg.delay_for(39), Duration::from_secs(2));
    }

    #[test]
    fn only_lock_contention_is_transient() {
        let locked = libsql::Error::SqliteFailure(5, "database is locked".into());
        let constraint =
            libsql::Error::SqliteFailure(19, "UNIQUE constraint failed: ledger_earnings".into());
        assert!(is_transient_error(&locked));
        assert!(!is_transient_error(&constraint));
    }
}
