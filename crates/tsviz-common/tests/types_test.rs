//! Tests for the shared record types and calendar keys.

use chrono::{Datelike, Duration, NaiveDate};
use proptest::prelude::*;
use tsviz_common::*;

#[test]
fn test_record_serialization() {
    let record = Record::new(NaiveDate::from_ymd_opt(2016, 5, 9).unwrap(), 1201);

    let serialized = serde_json::to_string(&record).unwrap();
    assert_eq!(serialized, r#"{"date":"2016-05-09","value":1201}"#);

    let deserialized: Record = serde_json::from_str(&serialized).unwrap();
    assert_eq!(deserialized, record);
}

#[test]
fn test_calendar_key_serialization() {
    let key = CalendarKey::from_date(NaiveDate::from_ymd_opt(2019, 12, 1).unwrap());
    let serialized = serde_json::to_string(&key).unwrap();
    assert_eq!(serialized, r#"{"year":2019,"month_abbrev":"Dec"}"#);
}

#[test]
fn test_month_tables_are_aligned() {
    for month in 1..=12 {
        let name = month_name(month).unwrap();
        let abbrev = month_abbrev(month).unwrap();
        assert!(name.starts_with(abbrev), "{name} / {abbrev}");
    }
}

proptest! {
    #[test]
    fn prop_calendar_key_sort_matches_date_sort(offsets in prop::collection::vec(0i64..3000, 1..60)) {
        let start = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap();
        let mut dates: Vec<NaiveDate> = offsets.iter().map(|d| start + Duration::days(*d)).collect();
        let mut keys: Vec<CalendarKey> = dates.iter().copied().map(CalendarKey::from_date).collect();

        dates.sort();
        keys.sort();

        let expected: Vec<(i32, u32)> = dates.iter().map(|d| (d.year(), d.month())).collect();
        let actual: Vec<(i32, u32)> = keys.iter().map(|k| (k.year, k.month_number())).collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn prop_record_accessors_match_chrono(offset in 0i64..20000) {
        let date = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap() + Duration::days(offset);
        let record = Record::new(date, 0);
        prop_assert_eq!(record.year(), date.year());
        prop_assert_eq!(record.month(), date.month());
        prop_assert_eq!(record.calendar_key().month_number(), date.month());
    }
}
