//! Human-readable duration formatting for job timing annotations

use std::time::Duration;

/// Format an elapsed interval as `47s`, `1m5s`, or `2h0m3s`.
///
/// Sub-second remainders are truncated.
pub fn format_duration(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{hours}h{minutes}m{seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m{seconds}s")
    } else {
        format!("{seconds}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_duration() {
        assert_eq!(format_duration(Duration::ZERO), "0s");
    }

    #[test]
    fn test_seconds_only() {
        assert_eq!(format_duration(Duration::from_secs(47)), "47s");
    }

    #[test]
    fn test_subsecond_truncated() {
        assert_eq!(format_duration(Duration::from_millis(65_400)), "1m5s");
    }

    #[test]
    fn test_minutes_and_seconds() {
        assert_eq!(format_duration(Duration::from_secs(83)), "1m23s");
    }

    #[test]
    fn test_hours() {
        assert_eq!(format_duration(Duration::from_secs(7203)), "2h0m3s");
    }
}
