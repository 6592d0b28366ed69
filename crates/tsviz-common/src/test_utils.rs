//! Test utilities and shared test helpers for the tsviz workspace.
//!
//! This module provides logging setup, temporary files and page view
//! fixtures that can be used across all crates for unit and integration
//! testing.

use crate::Record;
use chrono::{Duration, NaiveDate};
use std::sync::Once;

#[cfg(feature = "tracing-subscriber")]
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize test logging once per test run.
static INIT: Once = Once::new();

/// Initialize logging for tests with a sensible default configuration.
/// This function is safe to call multiple times and will only initialize once.
#[cfg(feature = "tracing-subscriber")]
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        fmt().with_test_writer().with_env_filter(filter).init();
    });
}

/// No-op version when tracing-subscriber is not available
#[cfg(not(feature = "tracing-subscriber"))]
pub fn init_test_logging() {
    INIT.call_once(|| {});
}

/// Create a temporary directory for tests that automatically cleans up.
#[cfg(feature = "tempfile")]
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Create a calendar date, panicking on invalid input.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

/// Assert that two floating point numbers are approximately equal within a tolerance.
pub fn assert_approx_eq(left: f64, right: f64, tolerance: f64) {
    let diff = (left - right).abs();
    assert!(
        diff <= tolerance,
        "assertion failed: `{left}` is not approximately equal to `{right}` (tolerance: {tolerance}, diff: {diff})"
    );
}

/// Page view fixtures.
pub mod pageview_fixtures {
    use super::*;

    /// Generate consecutive daily records starting at `start`.
    pub fn daily_records(
        start: NaiveDate,
        days: usize,
        value: impl Fn(usize) -> u64,
    ) -> Vec<Record> {
        (0..days)
            .map(|i| Record::new(start + Duration::days(i as i64), value(i)))
            .collect()
    }

    /// Deterministic, evenly spread value for day `i`.
    ///
    /// Values cycle through 1000..1500 with a stride coprime to the range so
    /// that the low and high tails land in many different months.
    pub fn spread_value(i: usize) -> u64 {
        1000 + ((i * 37) % 500) as u64
    }

    /// 730 daily records covering 2018 and 2019.
    pub fn two_year_series() -> Vec<Record> {
        daily_records(date(2018, 1, 1), 730, spread_value)
    }

    /// Daily records for every day of a single calendar month.
    pub fn single_month_series(year: i32, month: u32, values: &[u64]) -> Vec<Record> {
        daily_records(date(year, month, 1), values.len(), |i| values[i])
    }

    /// Render records as the `date,value` CSV the loader reads.
    pub fn to_csv(records: &[Record]) -> String {
        let mut out = String::from("date,value\n");
        for record in records {
            out.push_str(&format!("{},{}\n", record.date.format("%Y-%m-%d"), record.value));
        }
        out
    }

    /// Write records as CSV into `dir/name` and return the path.
    #[cfg(feature = "tempfile")]
    pub fn write_csv(dir: &std::path::Path, name: &str, records: &[Record]) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, to_csv(records)).expect("Failed to write CSV fixture");
        path
    }
}

/// Configuration-related test utilities.
pub mod config_fixtures {
    /// A partial TOML configuration overriding a few values.
    pub fn partial_config_toml() -> &'static str {
        r#"
[data]
source = "pageviews.csv"
lower_quantile = 0.05

[output]
directory = "charts"

[charts.line]
title = "Daily Views"
"#
    }

    /// A partial YAML configuration overriding a few values.
    pub fn partial_config_yaml() -> &'static str {
        r#"
data:
  source: "pageviews.csv"
  upper_quantile: 0.9
charts:
  bar:
    legend_title: "Month"
"#
    }
}
