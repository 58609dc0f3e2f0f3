//! Locale-fixed display formatting. Pure functions over already-normalized
//! values; no stored state, no mutation.

use chrono::{NaiveDate, NaiveTime, Timelike};

pub const DATE_TBD: &str = "Date TBD";
pub const TIME_TBD: &str = "Time TBD";
pub const TBD: &str = "TBD";

/// en-US long month, numeric day and year: "April 15, 2024".
pub fn format_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.format("%B %-d, %Y").to_string(),
        None => DATE_TBD.to_string(),
    }
}

/// 12-hour clock with AM/PM: "7:30 PM". Absent values and the 00:00:00
/// sentinel both render as the placeholder.
pub fn format_time(time: Option<NaiveTime>) -> String {
    match time {
        Some(t) if t.num_seconds_from_midnight() != 0 => t.format("%-I:%M %p").to_string(),
        _ => TIME_TBD.to_string(),
    }
}

/// Render-time default for optional text fields (location, genre, price).
pub fn tbd_or(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => TBD,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date() {
        let d = NaiveDate::from_ymd_opt(2024, 4, 15);
        assert_eq!(format_date(d), "April 15, 2024");
        assert_eq!(format_date(NaiveDate::from_ymd_opt(2025, 12, 3)), "December 3, 2025");
    }

    #[test]
    fn test_format_date_absent() {
        assert_eq!(format_date(None), "Date TBD");
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(NaiveTime::from_hms_opt(19, 30, 0)), "7:30 PM");
        assert_eq!(format_time(NaiveTime::from_hms_opt(9, 5, 0)), "9:05 AM");
        assert_eq!(format_time(NaiveTime::from_hms_opt(12, 0, 0)), "12:00 PM");
    }

    #[test]
    fn test_time_sentinel_and_absence_share_placeholder() {
        assert_eq!(format_time(NaiveTime::from_hms_opt(0, 0, 0)), "Time TBD");
        assert_eq!(format_time(None), "Time TBD");
    }

    #[test]
    fn test_formatting_is_idempotent_across_calls() {
        let d = NaiveDate::from_ymd_opt(2024, 4, 15);
        let t = NaiveTime::from_hms_opt(19, 30, 0);
        assert_eq!(format_date(d), format_date(d));
        assert_eq!(format_time(t), format_time(t));
    }

    #[test]
    fn test_tbd_or() {
        assert_eq!(tbd_or(Some("Red Rocks")), "Red Rocks");
        assert_eq!(tbd_or(Some("")), "TBD");
        assert_eq!(tbd_or(None), "TBD");
    }
}
