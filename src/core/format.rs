//! Display formatting helpers for the UI layer.

use chrono::{DateTime, Utc};

/// Formats a price in dollars, e.g. `"$12.34"`.
///
/// Non-finite input formats as `"$0.00"`.
#[must_use]
pub fn format_price(price: f64) -> String {
    if price.is_finite() {
        format!("${price:.2}")
    } else {
        "$0.00".to_string()
    }
}

/// Formats a percentage with the given number of decimals, e.g. `"42.5%"`.
///
/// Non-finite input formats as `"0%"`.
#[must_use]
pub fn format_percentage(value: f64, decimals: usize) -> String {
    if value.is_finite() {
        format!("{value:.decimals$}%")
    } else {
        "0%".to_string()
    }
}

/// Formats a timestamp relative to `now` ("Just now", "5 minutes ago",
/// "Yesterday", ...), falling back to an absolute date past one week.
#[must_use]
pub fn format_relative_time(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(timestamp);
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    if minutes < 1 {
        "Just now".to_string()
    } else if hours < 1 {
        plural(minutes, "minute")
    } else if days < 1 {
        plural(hours, "hour")
    } else if days < 2 {
        "Yesterday".to_string()
    } else if days < 7 {
        plural(days, "day")
    } else {
        timestamp.format("%b %-d, %Y").to_string()
    }
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{count} {unit}s ago")
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use chrono::Duration;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(12.34), "$12.34");
        assert_eq!(format_price(5.0), "$5.00");
        assert_eq!(format_price(0.125), "$0.13");
        assert_eq!(format_price(f64::NAN), "$0.00");
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(42.5, 1), "42.5%");
        assert_eq!(format_percentage(100.0, 0), "100%");
        assert_eq!(format_percentage(f64::INFINITY, 1), "0%");
    }

    #[test]
    fn test_relative_time_buckets() {
        let now = "2025-06-15T12:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let at = |d: Duration| now - d;

        assert_eq!(format_relative_time(at(Duration::seconds(20)), now), "Just now");
        assert_eq!(
            format_relative_time(at(Duration::minutes(1)), now),
            "1 minute ago"
        );
        assert_eq!(
            format_relative_time(at(Duration::minutes(45)), now),
            "45 minutes ago"
        );
        assert_eq!(format_relative_time(at(Duration::hours(3)), now), "3 hours ago");
        assert_eq!(format_relative_time(at(Duration::hours(30)), now), "Yesterday");
        assert_eq!(format_relative_time(at(Duration::days(3)), now), "3 days ago");
        assert_eq!(
            format_relative_time(at(Duration::days(10)), now),
            "Jun 5, 2025"
        );
    }

    #[test]
    fn test_future_timestamps_read_as_just_now() {
        let now = "2025-06-15T12:00:00Z".parse::<DateTime<Utc>>().unwrap();
        assert_eq!(
            format_relative_time(now + Duration::hours(1), now),
            "Just now"
        );
    }
}
