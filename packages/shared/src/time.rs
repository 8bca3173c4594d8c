//! Time-related utilities with clock abstraction for testability.
//!
//! Timestamps on the wire are Unix epoch milliseconds. Rendering is done in
//! UTC so that the same timestamp always produces the same text.

use chrono::{DateTime, Utc};

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Get current Unix timestamp (milliseconds)
    fn now_millis(&self) -> i64;
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        now_millis()
    }
}

/// Fixed clock implementation for testing (returns a fixed time)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    fixed_time: i64,
}

impl FixedClock {
    /// Create a new fixed clock with the given timestamp
    pub fn new(fixed_time_millis: i64) -> Self {
        Self {
            fixed_time: fixed_time_millis,
        }
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.fixed_time
    }
}

/// Get current Unix timestamp (milliseconds)
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

fn to_datetime(timestamp_millis: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(timestamp_millis)
}

/// Convert Unix timestamp (milliseconds) to RFC 3339 format in UTC.
///
/// Returns `None` when the timestamp is outside the representable range.
pub fn timestamp_to_rfc3339(timestamp_millis: i64) -> Option<String> {
    to_datetime(timestamp_millis).map(|dt| dt.to_rfc3339())
}

/// Format the time of day (`HH:MM`, UTC) of a Unix timestamp in milliseconds.
///
/// Out-of-range timestamps render as `--:--`.
pub fn format_time_of_day(timestamp_millis: i64) -> String {
    match to_datetime(timestamp_millis) {
        Some(dt) => dt.format("%H:%M").to_string(),
        None => "--:--".to_string(),
    }
}
