//! Percentile band outlier filtering.

use crate::dataset::Dataset;
use crate::statistics::quantile_sorted;
use tracing::{info, instrument};
use tsviz_common::{Result, VisualizerError};

/// Exclusive `(lower, upper)` bounds on page view counts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PercentileBand {
    /// Values must be strictly greater than this.
    pub lower: f64,
    /// Values must be strictly less than this.
    pub upper: f64,
}

impl PercentileBand {
    /// Computes the band from the quantiles of every value in `dataset`.
    ///
    /// Returns `None` for an empty dataset or quantiles outside `[0, 1]`.
    pub fn compute(dataset: &Dataset, lower_quantile: f64, upper_quantile: f64) -> Option<Self> {
        let mut sorted: Vec<f64> = dataset.values().map(|v| v as f64).collect();
        sorted.sort_by(f64::total_cmp);
        Some(Self {
            lower: quantile_sorted(&sorted, lower_quantile)?,
            upper: quantile_sorted(&sorted, upper_quantile)?,
        })
    }

    /// Whether `value` lies strictly inside the band.
    pub fn contains(&self, value: u64) -> bool {
        let value = value as f64;
        self.lower < value && value < self.upper
    }
}

/// Result of filtering a dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutcome {
    /// Records that survived, in their original order.
    pub dataset: Dataset,
    /// Band the records were tested against; `None` for empty input.
    pub band: Option<PercentileBand>,
    /// Number of records dropped.
    pub removed: usize,
}

/// Drops records outside the `[lower_quantile, upper_quantile]` band.
///
/// Bounds are computed once from the unfiltered input; the filter never
/// iterates to a fixed point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlierFilter {
    lower_quantile: f64,
    upper_quantile: f64,
}

impl OutlierFilter {
    /// Creates a filter for the given quantile levels.
    pub fn new(lower_quantile: f64, upper_quantile: f64) -> Result<Self> {
        let in_range = |q: f64| (0.0..=1.0).contains(&q);
        if !in_range(lower_quantile) || !in_range(upper_quantile) || lower_quantile >= upper_quantile {
            return Err(VisualizerError::config(format!(
                "invalid outlier band [{lower_quantile}, {upper_quantile}]"
            )));
        }
        Ok(Self {
            lower_quantile,
            upper_quantile,
        })
    }

    /// Lower quantile level.
    pub const fn lower_quantile(&self) -> f64 {
        self.lower_quantile
    }

    /// Upper quantile level.
    pub const fn upper_quantile(&self) -> f64 {
        self.upper_quantile
    }

    /// Computes the band from `dataset` and keeps only records inside it.
    #[instrument(skip_all, fields(records = dataset.len()))]
    pub fn apply(&self, dataset: &Dataset) -> FilterOutcome {
        let Some(band) = PercentileBand::compute(dataset, self.lower_quantile, self.upper_quantile)
        else {
            return FilterOutcome {
                dataset: Dataset::default(),
                band: None,
                removed: 0,
            };
        };

        let filtered = Self::apply_with_band(dataset, band);
        let removed = dataset.len() - filtered.len();
        info!(
            "Removed {} of {} records outside ({:.2}, {:.2})",
            removed,
            dataset.len(),
            band.lower,
            band.upper
        );

        FilterOutcome {
            dataset: filtered,
            band: Some(band),
            removed,
        }
    }

    /// Keeps only records strictly inside a fixed band.
    pub fn apply_with_band(dataset: &Dataset, band: PercentileBand) -> Dataset {
        dataset.iter().copied().filter(|r| band.contains(r.value)).collect()
    }
}

impl Default for OutlierFilter {
    fn default() -> Self {
        Self {
            lower_quantile: 0.025,
            upper_quantile: 0.975,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsviz_common::test_utils::pageview_fixtures::daily_records;
    use tsviz_common::test_utils::{assert_approx_eq, date};

    fn hundred_days() -> Dataset {
        // values 1..=100
        Dataset::new(daily_records(date(2019, 1, 1), 100, |i| i as u64 + 1))
    }

    #[test]
    fn test_band_uses_linear_interpolation() {
        let band = PercentileBand::compute(&hundred_days(), 0.025, 0.975).unwrap();
        // h = 99 * 0.025 = 2.475 -> 3 + 0.475; h = 99 * 0.975 = 96.525 -> 97 + 0.525
        assert_approx_eq(band.lower, 3.475, 1e-9);
        assert_approx_eq(band.upper, 97.525, 1e-9);
    }

    #[test]
    fn test_apply_keeps_strictly_inside() {
        let outcome = OutlierFilter::default().apply(&hundred_days());
        let values: Vec<u64> = outcome.dataset.values().collect();
        assert_eq!(values, (4..=97).collect::<Vec<_>>());
        assert_eq!(outcome.removed, 6);
    }

    #[test]
    fn test_boundary_values_are_excluded() {
        let band = PercentileBand {
            lower: 10.0,
            upper: 20.0,
        };
        assert!(!band.contains(10));
        assert!(band.contains(11));
        assert!(band.contains(19));
        assert!(!band.contains(20));
    }

    #[test]
    fn test_constant_series_is_emptied() {
        // both bounds equal the constant, so nothing is strictly inside
        let dataset = Dataset::new(daily_records(date(2019, 1, 1), 10, |_| 5));
        let outcome = OutlierFilter::default().apply(&dataset);
        assert!(outcome.dataset.is_empty());
        assert_eq!(outcome.removed, 10);
    }

    #[test]
    fn test_empty_input() {
        let outcome = OutlierFilter::default().apply(&Dataset::default());
        assert!(outcome.dataset.is_empty());
        assert!(outcome.band.is_none());
    }

    #[test]
    fn test_preserves_relative_order() {
        let values = [50u64, 1, 40, 99, 30, 60, 2, 70];
        let dataset = Dataset::new(daily_records(date(2019, 1, 1), values.len(), |i| values[i]));
        let band = PercentileBand {
            lower: 10.0,
            upper: 90.0,
        };
        let kept: Vec<u64> = OutlierFilter::apply_with_band(&dataset, band).values().collect();
        assert_eq!(kept, vec![50, 40, 30, 60, 70]);
    }

    #[test]
    fn test_new_validates_levels() {
        assert!(OutlierFilter::new(0.025, 0.975).is_ok());
        assert!(OutlierFilter::new(0.5, 0.5).is_err());
        assert!(OutlierFilter::new(0.9, 0.1).is_err());
        assert!(OutlierFilter::new(-0.1, 0.9).is_err());
        assert!(OutlierFilter::new(0.1, 1.1).is_err());
    }
}
