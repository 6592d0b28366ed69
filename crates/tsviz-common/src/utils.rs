//! Shared parsing and formatting helpers.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Formats a date as `YYYY-MM`.
pub fn format_year_month(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Parses an ISO-like date string.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS` and
/// RFC 3339 timestamps. Any time component is dropped.
pub fn parse_iso_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Some(date);
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(input, format) {
            return Some(datetime.date());
        }
    }
    DateTime::parse_from_rfc3339(input)
        .ok()
        .map(|datetime| datetime.date_naive())
}

/// Parses a non-negative integer count.
///
/// Float spellings with a zero or empty fractional part such as `"1201.0"`
/// or `"1201."` are accepted; negative or fractional numbers are not.
pub fn parse_count(input: &str) -> Option<u64> {
    let input = input.trim();
    if let Ok(value) = input.parse::<u64>() {
        return Some(value);
    }
    let (whole, fraction) = input.split_once('.')?;
    if !fraction.bytes().all(|b| b == b'0') {
        return None;
    }
    whole.parse::<u64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_year_month() {
        let date = NaiveDate::from_ymd_opt(2016, 5, 9).unwrap();
        assert_eq!(format_year_month(date), "2016-05");
    }

    #[test]
    fn test_parse_iso_date_variants() {
        let expected = NaiveDate::from_ymd_opt(2016, 5, 9);
        assert_eq!(parse_iso_date("2016-05-09"), expected);
        assert_eq!(parse_iso_date(" 2016-05-09 "), expected);
        assert_eq!(parse_iso_date("2016-05-09 13:45:00"), expected);
        assert_eq!(parse_iso_date("2016-05-09T13:45:00"), expected);
        assert_eq!(parse_iso_date("2016-05-09T13:45:00+02:00"), expected);
    }

    #[test]
    fn test_parse_iso_date_rejects_garbage() {
        assert_eq!(parse_iso_date(""), None);
        assert_eq!(parse_iso_date("09/05/2016"), None);
        assert_eq!(parse_iso_date("2016-13-01"), None);
        assert_eq!(parse_iso_date("2016-02-30"), None);
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("1201"), Some(1201));
        assert_eq!(parse_count(" 42 "), Some(42));
        assert_eq!(parse_count("1201.0"), Some(1201));
        assert_eq!(parse_count("1201.00"), Some(1201));
        assert_eq!(parse_count("1201.5"), None);
        assert_eq!(parse_count("-3"), None);
        assert_eq!(parse_count("many"), None);
        assert_eq!(parse_count(""), None);
    }

    #[test]
    fn test_parse_count_trailing_point() {
        assert_eq!(parse_count("1201."), Some(1201));
        assert_eq!(parse_count("0."), Some(0));
        assert_eq!(parse_count("."), None);
        assert_eq!(parse_count(".0"), None);
    }
}
