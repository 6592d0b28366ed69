//! Monthly aggregation of filtered page views.

use crate::dataset::Dataset;
use crate::statistics::truncated_mean;
use std::collections::BTreeMap;
use tracing::{debug, instrument};
use tsviz_common::{month_name, AggregatedRecord};

/// Trait for turning a dataset into chart-ready rows.
pub trait DataAggregator<T> {
    /// Process the dataset and return the aggregated rows.
    fn aggregate(&self, dataset: &Dataset) -> Vec<T>;
}

/// Groups records by `(year, month)` and takes the truncated mean of each
/// group.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonthlyAggregator;

impl MonthlyAggregator {
    /// Create a new monthly aggregator.
    pub const fn new() -> Self {
        Self
    }
}

impl DataAggregator<AggregatedRecord> for MonthlyAggregator {
    /// Rows come back sorted by `(year, month)`.
    #[instrument(skip_all, fields(records = dataset.len()))]
    fn aggregate(&self, dataset: &Dataset) -> Vec<AggregatedRecord> {
        let mut groups: BTreeMap<(i32, u32), Vec<u64>> = BTreeMap::new();
        for record in dataset {
            groups
                .entry((record.year(), record.month()))
                .or_default()
                .push(record.value);
        }

        let rows: Vec<AggregatedRecord> = groups
            .into_iter()
            .filter_map(|((year, month), values)| {
                truncated_mean(&values).map(|mean_value| AggregatedRecord {
                    year,
                    month,
                    mean_value,
                })
            })
            .collect();

        debug!("Aggregated into {} monthly groups", rows.len());
        rows
    }
}

/// Truncated monthly means of `dataset`, sorted by `(year, month)`.
pub fn aggregate_monthly(dataset: &Dataset) -> Vec<AggregatedRecord> {
    MonthlyAggregator::new().aggregate(dataset)
}

/// Year-by-month pivot of truncated monthly means.
///
/// Rows are years, ascending. Columns are the months that occur anywhere in
/// the table, in calendar order. Missing `(year, month)` cells stay absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonthlyTable {
    cells: BTreeMap<(i32, u32), u64>,
}

impl MonthlyTable {
    /// Pivots aggregated rows. A later row for the same cell replaces an
    /// earlier one.
    pub fn from_records(records: &[AggregatedRecord]) -> Self {
        let cells = records
            .iter()
            .filter(|r| (1..=12).contains(&r.month))
            .map(|r| ((r.year, r.month), r.mean_value))
            .collect();
        Self { cells }
    }

    /// Aggregates and pivots a dataset in one step.
    pub fn from_dataset(dataset: &Dataset) -> Self {
        Self::from_records(&aggregate_monthly(dataset))
    }

    /// Years with at least one cell, ascending.
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.cells.keys().map(|&(year, _)| year).collect();
        years.dedup();
        years
    }

    /// Months with at least one cell, in calendar order.
    pub fn months(&self) -> Vec<u32> {
        let mut present = [false; 12];
        for &(_, month) in self.cells.keys() {
            present[month as usize - 1] = true;
        }
        (1..=12).filter(|m| present[*m as usize - 1]).collect()
    }

    /// Column labels: full month names in calendar order.
    pub fn columns(&self) -> Vec<&'static str> {
        self.months().into_iter().filter_map(month_name).collect()
    }

    /// Mean for one cell.
    pub fn get(&self, year: i32, month: u32) -> Option<u64> {
        self.cells.get(&(year, month)).copied()
    }

    /// All twelve month cells of a year, January first.
    pub fn row(&self, year: i32) -> [Option<u64>; 12] {
        let mut row = [None; 12];
        for (slot, month) in row.iter_mut().zip(1..=12) {
            *slot = self.get(year, month);
        }
        row
    }

    /// Number of non-empty cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the table has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Largest cell value.
    pub fn max_value(&self) -> Option<u64> {
        self.cells.values().copied().max()
    }

    /// Cells as aggregated rows, sorted by `(year, month)`.
    pub fn iter(&self) -> impl Iterator<Item = AggregatedRecord> + '_ {
        self.cells.iter().map(|(&(year, month), &mean_value)| AggregatedRecord {
            year,
            month,
            mean_value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsviz_common::test_utils::date;
    use tsviz_common::Record;

    fn dataset(rows: &[(i32, u32, u32, u64)]) -> Dataset {
        rows.iter()
            .map(|&(y, m, d, v)| Record::new(date(y, m, d), v))
            .collect()
    }

    #[test]
    fn test_aggregate_truncates_means() {
        let data = dataset(&[
            (2017, 3, 1, 10),
            (2017, 3, 2, 11),
            (2017, 4, 1, 7),
            (2017, 4, 2, 8),
            (2017, 4, 3, 8),
        ]);
        let rows = MonthlyAggregator::new().aggregate(&data);
        assert_eq!(
            rows,
            vec![
                AggregatedRecord { year: 2017, month: 3, mean_value: 10 },
                AggregatedRecord { year: 2017, month: 4, mean_value: 7 },
            ]
        );
    }

    #[test]
    fn test_aggregate_sorts_groups() {
        let data = dataset(&[(2018, 1, 5, 1), (2017, 12, 5, 2), (2017, 2, 5, 3)]);
        let keys: Vec<(i32, u32)> = MonthlyAggregator::new()
            .aggregate(&data)
            .iter()
            .map(|r| (r.year, r.month))
            .collect();
        assert_eq!(keys, vec![(2017, 2), (2017, 12), (2018, 1)]);
    }

    #[test]
    fn test_table_columns_in_calendar_order() {
        let data = dataset(&[
            (2019, 12, 1, 1),
            (2019, 2, 1, 1),
            (2018, 8, 1, 1),
            (2018, 4, 1, 1),
        ]);
        let table = MonthlyTable::from_dataset(&data);
        assert_eq!(table.columns(), vec!["February", "April", "August", "December"]);
        assert_eq!(table.years(), vec![2018, 2019]);
    }

    #[test]
    fn test_table_leaves_missing_cells_absent() {
        let data = dataset(&[(2016, 5, 9, 1201), (2016, 5, 10, 2329), (2017, 1, 1, 40)]);
        let table = MonthlyTable::from_dataset(&data);

        assert_eq!(table.len(), 2);
        assert_eq!(table.get(2016, 5), Some(1765));
        assert_eq!(table.get(2016, 6), None);

        let row = table.row(2016);
        assert_eq!(row[4], Some(1765));
        assert_eq!(row.iter().flatten().count(), 1);
        assert_eq!(table.max_value(), Some(1765));
    }

    #[test]
    fn test_empty_dataset_gives_empty_table() {
        let table = MonthlyTable::from_dataset(&Dataset::default());
        assert!(table.is_empty());
        assert!(table.columns().is_empty());
        assert!(table.years().is_empty());
    }

    #[test]
    fn test_from_records_ignores_invalid_months() {
        let table = MonthlyTable::from_records(&[
            AggregatedRecord { year: 2020, month: 0, mean_value: 1 },
            AggregatedRecord { year: 2020, month: 13, mean_value: 1 },
            AggregatedRecord { year: 2020, month: 6, mean_value: 9 },
        ]);
        assert_eq!(table.iter().collect::<Vec<_>>(), vec![AggregatedRecord {
            year: 2020,
            month: 6,
            mean_value: 9
        }]);
    }
}
