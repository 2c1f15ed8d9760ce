//! Analysis stages.
//!
//! The pipeline is a pure function of the loaded records, the carrier
//! selection and the risk threshold. Re-running it with the same inputs
//! yields the same insights.

pub mod aggregator;
pub mod filter;
pub mod metrics;
pub mod risk;

pub use aggregator::*;
pub use filter::*;
pub use metrics::*;
pub use risk::*;

use crate::models::{CarrierDelay, DelayMetrics, PortDelayStats, ShipmentRecord};
use serde::Serialize;
use tracing::debug;

/// Everything the dashboard renders for one selection.
#[derive(Debug, Clone, Serialize)]
pub struct Insights<'a> {
    /// Records that passed the carrier filter.
    #[serde(skip)]
    pub filtered: Vec<&'a ShipmentRecord>,
    pub metrics: DelayMetrics,
    pub risk: RiskAssessment<'a>,
    pub carrier_delays: Vec<CarrierDelay>,
    pub port_delays: Vec<PortDelayStats>,
}

/// Run filter, metrics, risk detection and aggregation over `records`.
pub fn analyze<'a>(
    records: &'a [ShipmentRecord],
    selection: &CarrierSelection,
    threshold_days: i64,
) -> Insights<'a> {
    let filtered = filter_by_carrier(records, selection);
    debug!(
        "Filtered {} of {} records for {} carriers",
        filtered.len(),
        records.len(),
        selection.carriers().len()
    );

    let metrics = compute_metrics(&filtered);
    let risk = detect_high_risk(&filtered, threshold_days);
    debug!("Risk status: {}", risk.status);

    let carrier_delays = carrier_delays(&filtered);
    let port_delays = port_delay_stats(&filtered);

    Insights {
        filtered,
        metrics,
        risk,
        carrier_delays,
        port_delays,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::models::ShipmentRecord;
    use chrono::{Duration, NaiveDate};

    pub fn record(id: &str, carrier: &str, destination: &str, delay: i64) -> ShipmentRecord {
        let scheduled = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        ShipmentRecord::new(
            id,
            carrier,
            "Shanghai",
            destination,
            scheduled,
            scheduled + Duration::days(delay),
        )
    }

    /// A(X, 15), B(X, 3), C(Y, 12).
    pub fn sample_records() -> Vec<ShipmentRecord> {
        vec![
            record("A", "X", "Rotterdam", 15),
            record("B", "X", "Hamburg", 3),
            record("C", "Y", "Rotterdam", 12),
        ]
    }
}
