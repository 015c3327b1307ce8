//! Statistical helpers for the outlier check.

/// Whisker multiplier of the IQR rule.
pub const IQR_MULTIPLIER: f64 = 1.5;

/// Result of applying the IQR rule to one column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IqrSummary {
    pub q1: f64,
    pub q3: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
    /// Number of non-null values outside `[lower_bound, upper_bound]`.
    pub outlier_count: usize,
}

impl IqrSummary {
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

/// Quantile of already-sorted values using linear interpolation between the
/// two closest ranks.
pub(crate) fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }

    let position = (sorted.len() - 1) as f64 * q.clamp(0.0, 1.0);
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Apply the IQR rule to a column, ignoring nulls.
///
/// Returns `None` when the column has no non-null values.
pub fn iqr_outliers(values: &[Option<f64>]) -> Option<IqrSummary> {
    let mut sorted: Vec<f64> = values.iter().flatten().copied().filter(|v| !v.is_nan()).collect();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let q1 = quantile_sorted(&sorted, 0.25)?;
    let q3 = quantile_sorted(&sorted, 0.75)?;
    let iqr = q3 - q1;
    let lower_bound = q1 - IQR_MULTIPLIER * iqr;
    let upper_bound = q3 + IQR_MULTIPLIER * iqr;

    let outlier_count = sorted
        .iter()
        .filter(|&&val| val < lower_bound || val > upper_bound)
        .count();

    Some(IqrSummary {
        q1,
        q3,
        lower_bound,
        upper_bound,
        outlier_count,
    })
}
