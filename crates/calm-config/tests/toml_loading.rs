//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for sandboxed working directory and env vars.

use calm_config::{CalmConfig, ConfigError};
use pretty_assertions::assert_eq;

#[test]
fn loads_project_toml() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "calm.toml",
            r#"
[ledger]
db_path = "/var/lib/calm/ledger.db"
batch_limit = 10

[storage]
bucket = "calm-snapshots"
endpoint = "http://localhost:9000"
allow_http = true

[earnings]
per_hour_rate = 12.0
max_daily_time_earnings = 7.5
"#,
        )?;

        let config = CalmConfig::load().expect("config loads");
        assert_eq!(config.ledger.db_path, "/var/lib/calm/ledger.db");
        assert_eq!(config.ledger.batch_limit, 10);
        assert_eq!(config.storage.bucket, "calm-snapshots");
        assert!(config.storage.allow_http);
        assert!((config.earnings.per_hour_rate - 12.0).abs() < f64::EPSILON);
        assert!((config.earnings.max_daily_time_earnings - 7.5).abs() < f64::EPSILON);
        // Untouched fields keep their defaults.
        assert_eq!(config.earnings.bonus_eligibility_minutes, 360);
        assert_eq!(config.retry.max_attempts, 7);
        Ok(())
    });
}

#[test]
fn invalid_timezone_in_toml_fails_load() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "calm.toml",
            r#"
[earnings]
timezone = "Mars/Olympus_Mons"
"#,
        )?;

        let err = CalmConfig::load().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        Ok(())
    });
}
