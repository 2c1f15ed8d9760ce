//! Data models for the shipment dashboard.
//!
//! This module contains the core data structures shared by the loader,
//! the analysis stages and the report renderers.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel substituted for missing categorical values.
pub const UNKNOWN: &str = "Unknown";

/// A single cleaned row of the shipment dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentRecord {
    /// Opaque container identifier.
    #[serde(rename = "ContainerID")]
    pub container_id: String,
    /// Shipping line; `Unknown` when missing in the source.
    #[serde(rename = "Carrier")]
    pub carrier: String,
    /// Port of loading; `Unknown` when missing in the source.
    #[serde(rename = "Origin_Port")]
    pub origin_port: String,
    /// Port of discharge; `Unknown` when missing in the source.
    #[serde(rename = "Destination_Port")]
    pub destination_port: String,
    /// Planned arrival.
    #[serde(rename = "Scheduled_Arrival")]
    pub scheduled_arrival: NaiveDateTime,
    /// Observed arrival.
    #[serde(rename = "Actual_Arrival")]
    pub actual_arrival: NaiveDateTime,
    /// Whole days between scheduled and actual arrival, negative when early.
    #[serde(rename = "Delay_Days")]
    pub delay_days: i64,
}

impl ShipmentRecord {
    /// Builds a record, deriving `delay_days` from the two timestamps.
    pub fn new(
        container_id: impl Into<String>,
        carrier: impl Into<String>,
        origin_port: impl Into<String>,
        destination_port: impl Into<String>,
        scheduled_arrival: NaiveDateTime,
        actual_arrival: NaiveDateTime,
    ) -> Self {
        Self {
            container_id: container_id.into(),
            carrier: carrier.into(),
            origin_port: origin_port.into(),
            destination_port: destination_port.into(),
            scheduled_arrival,
            actual_arrival,
            delay_days: delay_in_days(scheduled_arrival, actual_arrival),
        }
    }
}

/// Whole days from `scheduled` to `actual`, floored.
///
/// A difference of -12 hours counts as -1 day.
pub fn delay_in_days(scheduled: NaiveDateTime, actual: NaiveDateTime) -> i64 {
    (actual - scheduled).num_seconds().div_euclid(86_400)
}

/// Headline numbers shown in the metrics strip.
///
/// `avg_delay` and `max_delay` are `None` for an empty selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DelayMetrics {
    /// Number of containers in the selection.
    pub count: usize,
    /// Mean delay rounded to two decimals.
    pub avg_delay: Option<f64>,
    /// Largest delay in the selection.
    pub max_delay: Option<i64>,
}

impl DelayMetrics {
    /// Formats the average for display, `N/A` when undefined.
    pub fn avg_display(&self) -> String {
        match self.avg_delay {
            Some(avg) => format!("{:.2}", avg),
            None => "N/A".to_string(),
        }
    }

    /// Formats the maximum for display, `N/A` when undefined.
    pub fn max_display(&self) -> String {
        match self.max_delay {
            Some(max) => format!("{} Days", max),
            None => "N/A".to_string(),
        }
    }
}

/// Two-state outcome of the risk check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RiskStatus {
    /// At least one shipment exceeded the threshold.
    Alert { count: usize },
    /// No shipment exceeded the threshold.
    Clear,
}

impl RiskStatus {
    pub fn is_alert(&self) -> bool {
        matches!(self, RiskStatus::Alert { .. })
    }

    /// Banner text shown above the high-risk table.
    pub fn banner(&self, threshold_days: i64) -> String {
        match self {
            RiskStatus::Alert { count } => format!(
                "ATTENTION: {} shipments have exceeded the {}-day delay threshold!",
                count, threshold_days
            ),
            RiskStatus::Clear => "All shipments are within acceptable delay limits.".to_string(),
        }
    }
}

impl fmt::Display for RiskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskStatus::Alert { count } => write!(f, "ALERT({})", count),
            RiskStatus::Clear => write!(f, "CLEAR"),
        }
    }
}

/// Mean delay for one carrier (one bar in the carrier chart).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarrierDelay {
    pub carrier: String,
    pub shipments: usize,
    pub mean_delay: f64,
}

/// Delay distribution for one destination port (one box in the port chart).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortDelayStats {
    pub destination_port: String,
    /// Every delay observed for the port, ascending.
    pub delays: Vec<i64>,
    pub min: i64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: i64,
    /// Lowest delay within 1.5 IQR below Q1.
    pub lower_whisker: i64,
    /// Highest delay within 1.5 IQR above Q3.
    pub upper_whisker: i64,
    /// Delays beyond the whiskers.
    pub outliers: Vec<i64>,
}

/// Metadata about a rendered dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardMetadata {
    /// Path of the dataset the records came from.
    pub dataset: String,
    /// When the dashboard was produced.
    pub generated_at: DateTime<Utc>,
    /// Number of records in the full dataset.
    pub total_records: usize,
    /// Carriers the view was restricted to.
    pub selected_carriers: Vec<String>,
    /// Delay above which a shipment is high-risk.
    pub threshold_days: i64,
}

impl DashboardMetadata {
    /// Metadata stamped with the current time.
    pub fn new(
        dataset: &std::path::Path,
        total_records: usize,
        selected_carriers: &[String],
        threshold_days: i64,
    ) -> Self {
        Self {
            dataset: dataset.display().to_string(),
            generated_at: Utc::now(),
            total_records,
            selected_carriers: selected_carriers.to_vec(),
            threshold_days,
        }
    }
}
