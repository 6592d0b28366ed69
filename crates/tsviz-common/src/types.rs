//! Core record types and calendar keys shared across the workspace.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Full English month names, January first.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Three-letter English month abbreviations, January first.
pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Gets the full month name for a 1-based month number.
pub fn month_name(month: u32) -> Option<&'static str> {
    month_index(month).map(|i| MONTH_NAMES[i])
}

/// Gets the three-letter abbreviation for a 1-based month number.
pub fn month_abbrev(month: u32) -> Option<&'static str> {
    month_index(month).map(|i| MONTH_ABBREVIATIONS[i])
}

fn month_index(month: u32) -> Option<usize> {
    (1..=12).contains(&month).then(|| month as usize - 1)
}

/// A single day of page views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    /// Calendar day the views were counted on.
    pub date: NaiveDate,
    /// Number of page views.
    pub value: u64,
}

impl Record {
    /// Creates a new record.
    pub const fn new(date: NaiveDate, value: u64) -> Self {
        Self { date, value }
    }

    /// Calendar year of the record.
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// Calendar month of the record, 1-12.
    pub fn month(&self) -> u32 {
        self.date.month()
    }

    /// Grouping key for the record.
    pub fn calendar_key(&self) -> CalendarKey {
        CalendarKey::from_date(self.date)
    }
}

/// Mean page views for one `(year, month)` group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AggregatedRecord {
    /// Calendar year.
    pub year: i32,
    /// Calendar month, 1-12.
    pub month: u32,
    /// Arithmetic mean with the fractional part discarded.
    pub mean_value: u64,
}

/// A `(year, month abbreviation)` pair used for grouping.
///
/// Keys order by year, then by calendar month, never lexically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CalendarKey {
    /// Calendar year.
    pub year: i32,
    /// One of [`MONTH_ABBREVIATIONS`].
    pub month_abbrev: &'static str,
}

impl CalendarKey {
    /// Derives the key for a date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month_abbrev: MONTH_ABBREVIATIONS[date.month0() as usize],
        }
    }

    /// The 1-based calendar month this key's abbreviation stands for.
    pub fn month_number(&self) -> u32 {
        MONTH_ABBREVIATIONS
            .iter()
            .position(|abbrev| *abbrev == self.month_abbrev)
            .map_or(0, |i| i as u32 + 1)
    }
}

impl PartialOrd for CalendarKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CalendarKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.year
            .cmp(&other.year)
            .then_with(|| self.month_number().cmp(&other.month_number()))
    }
}

impl fmt::Display for CalendarKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month_abbrev, self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_tables() {
        assert_eq!(month_name(1), Some("January"));
        assert_eq!(month_name(12), Some("December"));
        assert_eq!(month_name(0), None);
        assert_eq!(month_name(13), None);
        assert_eq!(month_abbrev(5), Some("May"));
        assert_eq!(month_abbrev(9), Some("Sep"));
    }

    #[test]
    fn test_record_accessors() {
        let record = Record::new(date(2016, 5, 9), 1201);
        assert_eq!(record.year(), 2016);
        assert_eq!(record.month(), 5);
        assert_eq!(record.calendar_key().month_abbrev, "May");
    }

    #[test]
    fn test_calendar_key_orders_by_calendar_not_lexically() {
        let apr = CalendarKey::from_date(date(2019, 4, 1));
        let aug = CalendarKey::from_date(date(2019, 8, 1));
        let dec_prev = CalendarKey::from_date(date(2018, 12, 31));

        // "Apr" < "Aug" lexically too, so check a pair that differs.
        let feb = CalendarKey::from_date(date(2019, 2, 1));
        let jan = CalendarKey::from_date(date(2019, 1, 1));
        assert!("Feb" < "Jan");
        assert!(jan < feb);

        let mut keys = vec![aug, feb, dec_prev, apr, jan];
        keys.sort();
        assert_eq!(keys, vec![dec_prev, jan, feb, apr, aug]);
    }

    #[test]
    fn test_calendar_key_display() {
        let key = CalendarKey::from_date(date(2017, 10, 3));
        assert_eq!(key.to_string(), "Oct 2017");
        assert_eq!(key.month_number(), 10);
    }
}
