//! Calendar bucketing for the box plots.

use crate::aggregator::DataAggregator;
use crate::dataset::Dataset;
use std::collections::BTreeMap;
use tsviz_common::{CalendarKey, Record, MONTH_ABBREVIATIONS};

/// A record paired with its calendar key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketedRecord {
    /// Year and month abbreviation of the record's date.
    pub key: CalendarKey,
    /// The record itself.
    pub record: Record,
}

/// Derives a [`CalendarKey`] for every record, in dataset order.
#[derive(Debug, Clone, Copy, Default)]
pub struct CalendarBucketer;

impl CalendarBucketer {
    /// Create a new bucketer.
    pub const fn new() -> Self {
        Self
    }
}

impl DataAggregator<BucketedRecord> for CalendarBucketer {
    fn aggregate(&self, dataset: &Dataset) -> Vec<BucketedRecord> {
        dataset
            .iter()
            .map(|&record| BucketedRecord {
                key: record.calendar_key(),
                record,
            })
            .collect()
    }
}

/// Calendar keys for every record, in dataset order.
pub fn bucket(dataset: &Dataset) -> Vec<BucketedRecord> {
    CalendarBucketer::new().aggregate(dataset)
}

/// Values grouped by year, years ascending.
pub fn group_by_year(buckets: &[BucketedRecord]) -> Vec<(i32, Vec<u64>)> {
    let mut groups: BTreeMap<i32, Vec<u64>> = BTreeMap::new();
    for bucket in buckets {
        groups.entry(bucket.key.year).or_default().push(bucket.record.value);
    }
    groups.into_iter().collect()
}

/// Values grouped by month abbreviation, always January to December.
///
/// Months without any records are omitted.
pub fn group_by_month(buckets: &[BucketedRecord]) -> Vec<(&'static str, Vec<u64>)> {
    let mut groups: [Vec<u64>; 12] = Default::default();
    for bucket in buckets {
        let month = bucket.key.month_number();
        if (1..=12).contains(&month) {
            groups[month as usize - 1].push(bucket.record.value);
        }
    }
    MONTH_ABBREVIATIONS
        .into_iter()
        .zip(groups)
        .filter(|(_, values)| !values.is_empty())
        .collect()
}
