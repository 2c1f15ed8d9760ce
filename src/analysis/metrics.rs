//! Headline delay metrics.

use crate::models::{DelayMetrics, ShipmentRecord};

/// Count, mean and max delay over a selection.
///
/// An empty selection yields `None` for the mean and max rather than NaN.
pub fn compute_metrics(records: &[&ShipmentRecord]) -> DelayMetrics {
    let count = records.len();
    let max_delay = records.iter().map(|r| r.delay_days).max();
    let avg_delay = if count == 0 {
        None
    } else {
        let total: i64 = records.iter().map(|r| r.delay_days).sum();
        Some(round2(total as f64 / count as f64))
    };

    DelayMetrics {
        count,
        avg_delay,
        max_delay,
    }
}

/// Round to two decimal places, ties to even.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
