//! Date helpers for reservation strings.
//!
//! Reservation dates are stored as whatever the booking flow produced: plain
//! dates, RFC 3339 timestamps or naive date-times. Nothing here assumes they
//! parse.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parse an ISO-like date string, keeping only the calendar date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    None
}

/// `dd/mm/yyyy`, or the input unchanged when it is not a date.
pub fn format_date(s: &str) -> String {
    match parse_date(s) {
        Some(date) => date.format("%d/%m/%Y").to_string(),
        None => s.to_string(),
    }
}

pub fn date_or_today(s: &str) -> NaiveDate {
    parse_date(s).unwrap_or_else(|| Utc::now().date_naive())
}

/// `YYYYMMDD`, falling back to today when the input is not a date.
pub fn format_ical_date(s: &str) -> String {
    date_or_today(s).format("%Y%m%d").to_string()
}

/// Nights between two date strings, if both parse and check-out is later.
pub fn nights_between(check_in: &str, check_out: &str) -> Option<i64> {
    let start = parse_date(check_in)?;
    let end = parse_date(check_out)?;
    let nights = (end - start).num_days();
    (nights > 0).then_some(nights)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_plain_dates() {
        assert_eq!(format_date("2024-03-09"), "09/03/2024");
    }

    #[test]
    fn formats_timestamps() {
        assert_eq!(format_date("2024-03-09T22:15:00Z"), "09/03/2024");
        assert_eq!(format_date("2024-03-09T22:15:00.123"), "09/03/2024");
    }

    #[test]
    fn invalid_dates_pass_through() {
        assert_eq!(format_date("next tuesday"), "next tuesday");
        assert_eq!(format_date(""), "");
        assert_eq!(format_date("2024-02-30"), "2024-02-30");
    }

    #[test]
    fn ical_dates() {
        assert_eq!(format_ical_date("2024-12-01"), "20241201");
        let today = Utc::now().date_naive().format("%Y%m%d").to_string();
        assert_eq!(format_ical_date("garbage"), today);
    }

    #[test]
    fn nights() {
        assert_eq!(nights_between("2024-06-01", "2024-06-04"), Some(3));
        assert_eq!(nights_between("2024-06-04", "2024-06-01"), None);
        assert_eq!(nights_between("2024-06-01", "2024-06-01"), None);
        assert_eq!(nights_between("soon", "2024-06-01"), None);
    }
}
