//! High-risk shipment detection.

use crate::models::{RiskStatus, ShipmentRecord};
use serde::Serialize;

/// Delay, in days, above which a shipment is high-risk.
pub const DEFAULT_THRESHOLD_DAYS: i64 = 10;

/// Result of the risk check over a selection.
#[derive(Debug, Clone, Serialize)]
pub struct RiskAssessment<'a> {
    pub threshold_days: i64,
    pub status: RiskStatus,
    /// Shipments over the threshold, worst first.
    pub high_risk: Vec<&'a ShipmentRecord>,
}

impl RiskAssessment<'_> {
    /// Banner text for the current status.
    pub fn banner(&self) -> String {
        self.status.banner(self.threshold_days)
    }
}

/// Flag records with `delay_days > threshold_days`, sorted by delay descending.
///
/// Ties keep their input order.
pub fn detect_high_risk<'a>(
    records: &[&'a ShipmentRecord],
    threshold_days: i64,
) -> RiskAssessment<'a> {
    let mut high_risk: Vec<&'a ShipmentRecord> = records
        .iter()
        .copied()
        .filter(|r| r.delay_days > threshold_days)
        .collect();
    high_risk.sort_by(|a, b| b.delay_days.cmp(&a.delay_days));

    let status = if high_risk.is_empty() {
        RiskStatus::Clear
    } else {
        RiskStatus::Alert {
            count: high_risk.len(),
        }
    };

    RiskAssessment {
        threshold_days,
        status,
        high_risk,
    }
}
