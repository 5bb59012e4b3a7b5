//! Time-related utilities with clock abstraction for testability.
//!
//! All wire-visible timestamps in the chat protocol are ISO 8601 strings in
//! UTC, so the helpers here always render with a `Z` suffix.

use chrono::{SecondsFormat, TimeZone, Utc};

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Get current Unix timestamp in UTC (milliseconds)
    fn now_utc_millis(&self) -> i64;

    /// Get the current time as an ISO 8601 UTC string
    fn now_utc_rfc3339(&self) -> String {
        millis_to_utc_rfc3339(self.now_utc_millis())
    }
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc_millis(&self) -> i64 {
        utc_now_millis()
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
    fn now_utc_millis(&self) -> i64 {
        self.fixed_time
    }
}

/// Get current Unix timestamp in UTC (milliseconds)
pub fn utc_now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Get the current time as an ISO 8601 UTC string (millisecond precision)
pub fn utc_now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Convert a Unix timestamp (milliseconds) to an ISO 8601 UTC string
pub fn millis_to_utc_rfc3339(timestamp_millis: i64) -> String {
    let seconds = timestamp_millis.div_euclid(1000);
    let nanos = (timestamp_millis.rem_euclid(1000) * 1_000_000) as u32;
    match Utc.timestamp_opt(seconds, nanos) {
        chrono::LocalResult::Single(dt) => dt.to_rfc3339_opts(SecondsFormat::Millis, true),
        // Out-of-range timestamps only occur with corrupted input; render epoch
        _ => Utc
            .timestamp_opt(0, 0)
            .unwrap()
            .to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_returns_non_zero_timestamp() {
        // given:
        let clock = SystemClock;

        // when:
        let timestamp = clock.now_utc_millis();

        // then:
        assert!(timestamp > 0);
    }

    #[test]
    fn test_system_clock_returns_increasing_timestamps() {
        // given:
        let clock = SystemClock;

        // when:
        let timestamp1 = clock.now_utc_millis();
        std::thread::sleep(std::time::Duration::from_millis(10));
        let timestamp2 = clock.now_utc_millis();

        // then:
        assert!(timestamp2 >= timestamp1);
    }

    #[test]
    fn test_fixed_clock_returns_fixed_timestamp() {
        // given:
        let fixed_time = 1234567890123;
        let clock = FixedClock::new(fixed_time);

        // when:
        let timestamp = clock.now_utc_millis();

        // then:
        assert_eq!(timestamp, fixed_time);
    }

    #[test]
    fn test_fixed_clock_rfc3339_is_deterministic() {
        // given:
        let clock = FixedClock::new(1672531200000); // 2023-01-01T00:00:00Z

        // when:
        let rendered1 = clock.now_utc_rfc3339();
        let rendered2 = clock.now_utc_rfc3339();

        // then:
        assert_eq!(rendered1, "2023-01-01T00:00:00.000Z");
        assert_eq!(rendered1, rendered2);
    }

    #[test]
    fn test_millis_to_utc_rfc3339_format() {
        // given:
        // 2023-01-01 00:00:00 UTC in milliseconds
        let timestamp = 1672531200000;

        // when:
        let result = millis_to_utc_rfc3339(timestamp);

        // then:
        assert!(result.starts_with("2023-01-01T00:00:00"));
        assert!(result.ends_with('Z'));
    }

    #[test]
    fn test_millis_to_utc_rfc3339_with_milliseconds() {
        // given:
        let timestamp = 1672531200123;

        // when:
        let result = millis_to_utc_rfc3339(timestamp);

        // then:
        assert_eq!(result, "2023-01-01T00:00:00.123Z");
    }

    #[test]
    fn test_utc_now_rfc3339_ends_with_z() {
        // given:

        // when:
        let rendered = utc_now_rfc3339();

        // then:
        assert!(rendered.ends_with('Z'));
    }
}
