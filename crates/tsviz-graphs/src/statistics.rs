//! Quantiles, truncated means and box plot summaries.

/// Linear-interpolation quantile of already sorted values.
///
/// With `h = (n - 1) * q` the result is
/// `v[floor(h)] + (h - floor(h)) * (v[floor(h) + 1] - v[floor(h)])`.
/// Returns `None` for empty input or `q` outside `[0, 1]`.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }
    let h = (sorted.len() - 1) as f64 * q;
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    Some(sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo]))
}

/// Linear-interpolation quantile of unsorted counts.
pub fn quantile(values: impl IntoIterator<Item = u64>, q: f64) -> Option<f64> {
    quantile_sorted(&sorted_f64(values), q)
}

/// Arithmetic mean with the fractional part discarded.
///
/// Integer division keeps the result exact for any input order.
pub fn truncated_mean(values: &[u64]) -> Option<u64> {
    if values.is_empty() {
        return None;
    }
    let sum: u128 = values.iter().map(|&v| u128::from(v)).sum();
    u64::try_from(sum / values.len() as u128).ok()
}

fn sorted_f64(values: impl IntoIterator<Item = u64>) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.into_iter().map(|v| v as f64).collect();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Five-number summary of one box in a box-and-whisker plot.
///
/// Whiskers reach the most extreme observations within 1.5 IQR of the box;
/// anything beyond is listed in `outliers`.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    /// Smallest observation not below `q1 - 1.5 * iqr`.
    pub lower_whisker: f64,
    /// First quartile.
    pub q1: f64,
    /// Median.
    pub median: f64,
    /// Third quartile.
    pub q3: f64,
    /// Largest observation not above `q3 + 1.5 * iqr`.
    pub upper_whisker: f64,
    /// Observations outside the whiskers, ascending.
    pub outliers: Vec<f64>,
    /// Number of observations summarized.
    pub count: usize,
}

impl BoxStats {
    /// Whisker reach as a multiple of the interquartile range.
    pub const WHISKER_IQR: f64 = 1.5;

    /// Summarizes a group of counts. Returns `None` for an empty group.
    pub fn from_values(values: &[u64]) -> Option<Self> {
        let sorted = sorted_f64(values.iter().copied());
        let q1 = quantile_sorted(&sorted, 0.25)?;
        let median = quantile_sorted(&sorted, 0.5)?;
        let q3 = quantile_sorted(&sorted, 0.75)?;

        let iqr = q3 - q1;
        let low_fence = q1 - Self::WHISKER_IQR * iqr;
        let high_fence = q3 + Self::WHISKER_IQR * iqr;

        let lower_whisker = sorted.iter().copied().find(|v| *v >= low_fence).unwrap_or(q1);
        let upper_whisker = sorted.iter().rev().copied().find(|v| *v <= high_fence).unwrap_or(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|v| !(low_fence..=high_fence).contains(v))
            .collect();

        Some(Self {
            lower_whisker,
            q1,
            median,
            q3,
            upper_whisker,
            outliers,
            count: sorted.len(),
        })
    }

    /// Largest value drawn for this box, outliers included.
    pub fn max_drawn(&self) -> f64 {
        self.outliers
            .last()
            .copied()
            .map_or(self.upper_whisker, |o| o.max(self.upper_whisker))
    }
}
