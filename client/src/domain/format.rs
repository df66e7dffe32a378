//! Display helpers shared by page contexts and the command-line walkthrough.

use chrono::{DateTime, TimeDelta, Utc};

/// Render `then` relative to `now`: "just now", "5 minutes ago", ... and the
/// calendar date once a week has passed.
///
/// # Examples
/// ```
/// use chrono::{TimeDelta, Utc};
/// use flutterpage::domain::relative_time;
///
/// let now = Utc::now();
/// assert_eq!(relative_time(now - TimeDelta::minutes(5), now), "5 minutes ago");
/// ```
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(then);
    if elapsed < TimeDelta::minutes(1) {
        return "just now".to_owned();
    }
    if elapsed < TimeDelta::hours(1) {
        return format!("{} minutes ago", elapsed.num_minutes());
    }
    if elapsed < TimeDelta::days(1) {
        return format!("{} hours ago", elapsed.num_hours());
    }
    if elapsed < TimeDelta::weeks(1) {
        return format!("{} days ago", elapsed.num_days());
    }
    then.date_naive().format("%Y-%m-%d").to_string()
}

/// Abbreviate large counts in units of ten thousand (万).
///
/// # Examples
/// ```
/// use flutterpage::domain::compact_count;
///
/// assert_eq!(compact_count(9_999), "9999");
/// assert_eq!(compact_count(1_234_567), "123.5万");
/// ```
pub fn compact_count(count: u64) -> String {
    if count < 10_000 {
        return count.to_string();
    }
    let tens_of_thousands = count as f64 / 10_000.0;
    format!("{tens_of_thousands:.1}万")
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(TimeDelta::seconds(30), "just now")]
    #[case(TimeDelta::minutes(59), "59 minutes ago")]
    #[case(TimeDelta::hours(3), "3 hours ago")]
    #[case(TimeDelta::days(6), "6 days ago")]
    fn recent_times_are_relative(#[case] ago: TimeDelta, #[case] expected: &str) {
        let now = DateTime::parse_from_rfc3339("2024-05-20T12:00:00Z")
            .expect("valid timestamp")
            .with_timezone(&Utc);
        assert_eq!(relative_time(now - ago, now), expected);
    }

    #[test]
    fn older_times_show_the_date() {
        let now = DateTime::parse_from_rfc3339("2024-05-20T12:00:00Z")
            .expect("valid timestamp")
            .with_timezone(&Utc);
        assert_eq!(relative_time(now - TimeDelta::days(10), now), "2024-05-10");
    }

    #[rstest]
    #[case(0, "0")]
    #[case(10_000, "1.0万")]
    #[case(25_400, "2.5万")]
    fn counts_abbreviate_at_ten_thousand(#[case] count: u64, #[case] expected: &str) {
        assert_eq!(compact_count(count), expected);
    }
}
